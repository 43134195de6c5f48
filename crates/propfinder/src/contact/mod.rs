use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Call,
    Sms,
    WhatsApp,
    Email,
}

impl ContactChannel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Call, Self::Sms, Self::WhatsApp, Self::Email]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Call => "Call",
            Self::Sms => "SMS",
            Self::WhatsApp => "WhatsApp",
            Self::Email => "Email",
        }
    }
}

/// A user-initiated contact action against a listing's agent or agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub channel: ContactChannel,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A fully-built deep link ready for the host platform to open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactLink {
    pub channel: ContactChannel,
    pub href: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("contact request has no phone number")]
    MissingPhone,
    #[error("contact request has no email address")]
    MissingEmail,
    #[error("'{0}' is not a dialable phone number")]
    InvalidPhone(String),
    #[error("'{0}' is not a usable email address")]
    InvalidEmail(String),
    #[error("failed to build contact link: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("contact channel unavailable: {0}")]
    Unavailable(String),
}

/// Capability seam between the pure link builder and the platform that can
/// actually place calls or open composers. Implementations record or
/// forward the link; they never re-interpret it.
pub trait LinkDispatcher: Send + Sync {
    fn dispatch(&self, link: ContactLink) -> Result<(), DispatchError>;
}

pub fn build_link(request: &ContactRequest) -> Result<ContactLink, ContactError> {
    let href = match request.channel {
        ContactChannel::Call => {
            let phone = normalized_phone(request)?;
            format!("tel:{phone}")
        }
        ContactChannel::Sms => {
            let phone = normalized_phone(request)?;
            match request.message.as_deref().filter(|m| !m.trim().is_empty()) {
                Some(message) => {
                    let body: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
                    format!("sms:{phone}?body={body}")
                }
                None => format!("sms:{phone}"),
            }
        }
        ContactChannel::WhatsApp => {
            let phone = normalized_phone(request)?;
            // wa.me wants E.164 digits without the plus sign.
            let digits = phone.trim_start_matches('+');
            let mut url = Url::parse(&format!("https://wa.me/{digits}"))?;
            if let Some(message) = request.message.as_deref().filter(|m| !m.trim().is_empty()) {
                url.query_pairs_mut().append_pair("text", message);
            }
            url.to_string()
        }
        ContactChannel::Email => {
            let email = request
                .email
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or(ContactError::MissingEmail)?;
            if !email.contains('@') || email.contains(char::is_whitespace) {
                return Err(ContactError::InvalidEmail(email.to_string()));
            }

            let mut query = form_urlencoded::Serializer::new(String::new());
            if let Some(subject) = request.subject.as_deref().filter(|s| !s.trim().is_empty()) {
                query.append_pair("subject", subject);
            }
            if let Some(message) = request.message.as_deref().filter(|m| !m.trim().is_empty()) {
                query.append_pair("body", message);
            }
            let query = query.finish();
            if query.is_empty() {
                format!("mailto:{email}")
            } else {
                format!("mailto:{email}?{query}")
            }
        }
    };

    Ok(ContactLink {
        channel: request.channel,
        href,
    })
}

/// Strips separators, keeps one leading plus, and requires enough digits to
/// dial. `+971 50-123 4567` becomes `+971501234567`.
fn normalized_phone(request: &ContactRequest) -> Result<String, ContactError> {
    let raw = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ContactError::MissingPhone)?;

    let mut normalized = String::with_capacity(raw.len());
    for (index, ch) in raw.chars().enumerate() {
        if ch.is_ascii_digit() {
            normalized.push(ch);
        } else if ch == '+' && index == 0 {
            normalized.push(ch);
        } else if matches!(ch, ' ' | '-' | '(' | ')' | '.') {
            continue;
        } else {
            return Err(ContactError::InvalidPhone(raw.to_string()));
        }
    }

    let digits = normalized.trim_start_matches('+').len();
    if digits < 5 {
        return Err(ContactError::InvalidPhone(raw.to_string()));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(channel: ContactChannel) -> ContactRequest {
        ContactRequest {
            channel,
            phone: Some("+971 50-123 4567".to_string()),
            email: Some("agent@example.com".to_string()),
            subject: None,
            message: None,
        }
    }

    #[test]
    fn call_link_normalizes_the_number() {
        let link = build_link(&request(ContactChannel::Call)).expect("link builds");
        assert_eq!(link.href, "tel:+971501234567");
    }

    #[test]
    fn sms_link_encodes_the_body() {
        let mut req = request(ContactChannel::Sms);
        req.message = Some("Is the 2BR still available?".to_string());
        let link = build_link(&req).expect("link builds");
        assert_eq!(
            link.href,
            "sms:+971501234567?body=Is+the+2BR+still+available%3F"
        );
    }

    #[test]
    fn whatsapp_link_drops_the_plus_sign() {
        let mut req = request(ContactChannel::WhatsApp);
        req.message = Some("Hello".to_string());
        let link = build_link(&req).expect("link builds");
        assert_eq!(link.href, "https://wa.me/971501234567?text=Hello");
    }

    #[test]
    fn email_link_carries_subject_and_body() {
        let mut req = request(ContactChannel::Email);
        req.subject = Some("Marina View 2BR".to_string());
        req.message = Some("Please share the floor plan".to_string());
        let link = build_link(&req).expect("link builds");
        assert_eq!(
            link.href,
            "mailto:agent@example.com?subject=Marina+View+2BR&body=Please+share+the+floor+plan"
        );
    }

    #[test]
    fn missing_and_invalid_targets_are_rejected() {
        let mut req = request(ContactChannel::Call);
        req.phone = None;
        assert!(matches!(
            build_link(&req),
            Err(ContactError::MissingPhone)
        ));

        let mut req = request(ContactChannel::Call);
        req.phone = Some("call me maybe".to_string());
        assert!(matches!(
            build_link(&req),
            Err(ContactError::InvalidPhone(_))
        ));

        let mut req = request(ContactChannel::Email);
        req.email = Some("not-an-email".to_string());
        assert!(matches!(
            build_link(&req),
            Err(ContactError::InvalidEmail(_))
        ));
    }
}
