//! Confirmation link and message composition.

use crate::config::ConfirmConfig;
use uuid::Uuid;

/// Build the confirmation link URL embedded in the email.
///
/// Returns `{base_url}{path}?user={user_id}&token={token}`; the confirm
/// handler parses the same pair back out of the query string.
pub fn confirmation_link_build(config: &ConfirmConfig, user_id: Uuid, token: &str) -> String {
    format!(
        "{}{}?user={}&token={}",
        config.link_base_url,
        crate::handlers::CONFIRM_EMAIL_PATH,
        user_id,
        token
    )
}

/// Compose the confirmation email subject and body for a link.
pub(crate) fn confirmation_message_build(config: &ConfirmConfig, link: &str) -> (String, String) {
    let subject = format!("Please confirm your email address for {}", config.site_name);
    let body = format!(
        "Hello,\n\n\
         Thank you for registering at {site}. To complete your registration and \
         access your account, please confirm your email address by clicking the \
         link below:\n\n\
         {link}\n\n\
         If you did not request this, please ignore this email.\n\n\
         Best regards,\n\
         The {site} Team",
        site = config.site_name,
        link = link,
    );

    (subject, body)
}
