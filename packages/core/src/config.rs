use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::Cli;

pub const DEFAULT_GEMINI_MODEL: &str = "models/gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.brevo.com/v3/smtp/email";
pub const DEFAULT_SUMMARY_WORD_LIMIT: usize = 50;

/// Process-wide settings, read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub generation: GenerationSettings,
    pub summary_word_limit: usize,
    pub mail: MailSettings,
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub api_key: Secret,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTransport {
    Smtp,
    Api,
}

impl FromStr for EmailTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(EmailTransport::Smtp),
            "api" | "http" => Ok(EmailTransport::Api),
            other => Err(format!("Invalid EMAIL_TRANSPORT: {} (expected smtp or api)", other)),
        }
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Connection is encrypted from the first byte (SMTPS).
    Implicit,
    /// Plain connection upgraded with STARTTLS.
    StartTls,
    /// No encryption. Only for local relays.
    None,
}

impl SmtpTls {
    pub fn default_port(self) -> u16 {
        match self {
            SmtpTls::Implicit => 465,
            SmtpTls::StartTls => 587,
            SmtpTls::None => 25,
        }
    }
}

impl FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tls" | "ssl" | "implicit" => Ok(SmtpTls::Implicit),
            "starttls" | "explicit" => Ok(SmtpTls::StartTls),
            "none" => Ok(SmtpTls::None),
            other => Err(format!(
                "Invalid SMTP_TLS: {} (expected tls, starttls or none)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub tls: SmtpTls,
    pub username: Option<String>,
    pub password: Option<Secret>,
    pub from: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProviderApiSettings {
    pub url: String,
    pub api_key: Option<Secret>,
    pub sender: Option<String>,
    pub sender_name: String,
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub transport: EmailTransport,
    pub smtp: SmtpSettings,
    pub api: ProviderApiSettings,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("GOOGLE_API_KEY"))
            .ok_or("GEMINI_API_KEY (or GOOGLE_API_KEY) is required")?;

        let generation = GenerationSettings {
            api_key: Secret::new(api_key),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(parse_or(
                get("GENERATION_TIMEOUT_SECONDS"),
                "GENERATION_TIMEOUT_SECONDS",
                30,
            )?),
        };

        let transport = match get("EMAIL_TRANSPORT") {
            Some(raw) => raw.parse()?,
            None => EmailTransport::Smtp,
        };

        let tls = match get("SMTP_TLS") {
            Some(raw) => raw.parse()?,
            None => SmtpTls::Implicit,
        };

        let smtp_username = get("SMTP_USERNAME");
        let smtp = SmtpSettings {
            host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port: parse_or(get("SMTP_PORT"), "SMTP_PORT", tls.default_port())?,
            tls,
            from: get("SMTP_FROM").or_else(|| smtp_username.clone()),
            username: smtp_username,
            password: get("SMTP_PASSWORD").map(Secret::new),
        };

        let api = ProviderApiSettings {
            url: get("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            api_key: get("EMAIL_API_KEY").map(Secret::new),
            sender: get("EMAIL_SENDER"),
            sender_name: get("EMAIL_SENDER_NAME").unwrap_or_else(|| "Remedi Alerts".to_string()),
        };

        let mail = MailSettings {
            transport,
            smtp,
            api,
            timeout: Duration::from_secs(parse_or(
                get("MAIL_TIMEOUT_SECONDS"),
                "MAIL_TIMEOUT_SECONDS",
                20,
            )?),
        };

        let summary_word_limit = parse_or(
            get("SUMMARY_WORD_LIMIT"),
            "SUMMARY_WORD_LIMIT",
            DEFAULT_SUMMARY_WORD_LIMIT,
        )?;
        if summary_word_limit == 0 {
            return Err("SUMMARY_WORD_LIMIT must be greater than zero".to_string());
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 8000)?,
            generation,
            summary_word_limit,
            mail,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(model) = &cli.model {
            self.generation.model = model.clone();
        }
        if let Some(transport) = &cli.email_transport {
            self.mail.transport = transport.parse()?;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, String> {
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}
