use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters, TlsVersion};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info, instrument};

use crate::config::{MinTlsVersion, SendMailConfig};
use crate::error::MailError;

/// Return result of a delivered message.
pub const SENT_MAIL_SUCCESSFULLY: &str = "SentMailSuccessfully";

fn mailbox(field: &'static str, address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        field,
        address: address.to_owned(),
        reason: e.to_string(),
    })
}

/// Build a `lettre::Message` from the resolved inputs.
pub fn build_message(config: &SendMailConfig) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox("from", &config.from)?)
        .subject(&config.subject);
    for to in &config.to {
        builder = builder.to(mailbox("to", to)?);
    }
    for cc in &config.cc {
        builder = builder.cc(mailbox("cc", cc)?);
    }
    for bcc in &config.bcc {
        builder = builder.bcc(mailbox("bcc", bcc)?);
    }

    let part = if config.html {
        SinglePart::html(config.body.clone())
    } else {
        SinglePart::plain(config.body.clone())
    };
    Ok(builder.singlepart(part)?)
}

/// Build an async SMTP transport from the resolved inputs.
///
/// With TLS enabled the connection is upgraded with STARTTLS and the upgrade
/// is required.
pub fn build_transport(
    config: &SendMailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.hostname)
        .port(config.port)
        .timeout(Some(config.timeout));

    let builder = if config.enable_tls {
        let version = match config.tls_version {
            MinTlsVersion::Tls12 => TlsVersion::Tlsv12,
            MinTlsVersion::Tls13 => TlsVersion::Tlsv13,
        };
        let parameters = TlsParameters::builder(config.hostname.clone())
            .dangerous_accept_invalid_certs(config.trust_all_roots)
            .set_min_tls_version(version)
            .build_rustls()?;
        debug!(ciphers = config.cipher_suites.len(), "using STARTTLS");
        builder.tls(Tls::Required(parameters))
    } else {
        builder
    };

    let builder = if config.username.is_empty() {
        builder
    } else {
        builder.credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
    };

    Ok(builder.build())
}

/// Deliver one message.
#[instrument(skip(config), fields(host = %config.hostname, port = config.port))]
pub async fn send_mail(config: &SendMailConfig) -> Result<(), MailError> {
    let message = build_message(config)?;
    let transport = build_transport(config)?;
    info!(recipients = config.to.len(), subject = %config.subject, "sending email via SMTP");
    transport.send(message).await.map_err(|e| {
        error!(error = %e, "SMTP send failed");
        MailError::Smtp(e)
    })?;
    info!("email sent successfully via SMTP");
    Ok(())
}
