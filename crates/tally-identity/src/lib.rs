pub mod device_resolver;
pub mod error;
pub mod mailer;
pub mod token_issuer;
pub mod token_redeemer;

pub use device_resolver::DeviceResolver;
pub use error::{IdentityError, Result};
pub use mailer::{LogMailer, MailError, Mailer, SmtpMailer};
pub use token_issuer::TokenIssuer;
pub use token_redeemer::TokenRedeemer;
