mod identity;
mod verification_token;
