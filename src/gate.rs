//! Optional precondition that must hold before a simulation may be requested
//!
//! A [`SimulationRequest`] can only be built from a [`RunPermit`], and only an
//! [`AccessGate`] hands out permits. The engine never looks at the gate.

use thiserror::Error;

use crate::simulation::SimulationParameters;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("A contact address is required before running a simulation")]
    MissingContact,

    #[error("Invalid contact address: {0}")]
    InvalidContact(String),

    #[error("Contact domain not allowed: {0}")]
    DomainNotAllowed(String),
}

/// Proof that the gate admitted the caller
#[derive(Debug, Clone)]
pub struct RunPermit {
    contact: Option<String>,
}

impl RunPermit {
    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }
}

pub trait AccessGate {
    fn admit(&self, contact: Option<&str>) -> Result<RunPermit, GateError>;
}

/// Admits everyone, keeping any contact that was offered
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl AccessGate for OpenGate {
    fn admit(&self, contact: Option<&str>) -> Result<RunPermit, GateError> {
        Ok(RunPermit {
            contact: contact.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        })
    }
}

/// Requires a well-formed email address, optionally from an allowed domain
#[derive(Debug, Clone, Default)]
pub struct ContactGate {
    allowed_domains: Vec<String>,
}

impl ContactGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict admission to these domains (case-insensitive); empty allows any
    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }
}

impl AccessGate for ContactGate {
    fn admit(&self, contact: Option<&str>) -> Result<RunPermit, GateError> {
        let contact = contact
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(GateError::MissingContact)?;

        let domain = email_domain(contact)
            .ok_or_else(|| GateError::InvalidContact(contact.to_string()))?
            .to_ascii_lowercase();

        if !self.allowed_domains.is_empty() && !self.allowed_domains.contains(&domain) {
            return Err(GateError::DomainNotAllowed(domain));
        }

        Ok(RunPermit {
            contact: Some(contact.to_string()),
        })
    }
}

/// Domain part of `local@domain.tld`, or None if the address is malformed
fn email_domain(address: &str) -> Option<&str> {
    let (local, domain) = address.split_once('@')?;
    if local.is_empty() || domain.contains('@') || address.contains(char::is_whitespace) {
        return None;
    }
    let (name, tld) = domain.rsplit_once('.')?;
    if name.is_empty() || tld.len() < 2 || domain.starts_with('.') || domain.contains("..") {
        return None;
    }
    Some(domain)
}

/// Parameters bundled with the permit that allows running them
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    permit: RunPermit,
    params: SimulationParameters,
}

impl SimulationRequest {
    pub fn new(permit: RunPermit, params: SimulationParameters) -> Self {
        Self { permit, params }
    }

    pub fn permit(&self) -> &RunPermit {
        &self.permit
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }
}
