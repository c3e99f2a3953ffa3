use thiserror::Error;

/// Errors returned by [`super::Route53Backend`].
///
/// Each variant maps to a Route53 error code and HTTP status; the message is
/// what ends up in the `<Message>` element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("No hosted zone found with ID: {0}")]
    NoSuchHostedZone(String),

    #[error("A hosted zone has already been created with the specified caller reference: {0}")]
    HostedZoneAlreadyExists(String),

    #[error("The specified hosted zone contains non-required resource record sets: {0}")]
    HostedZoneNotEmpty(String),

    #[error("{0} is not a valid domain name")]
    InvalidDomainName(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidChangeBatch(String),

    #[error("A change with the specified change ID does not exist: {0}")]
    NoSuchChange(String),

    #[error("No health check exists with the specified ID: {0}")]
    NoSuchHealthCheck(String),

    #[error("A health check has already been created with the specified caller reference: {0}")]
    HealthCheckAlreadyExists(String),

    #[error("The health check {0} is still referenced from a resource record set")]
    HealthCheckInUse(String),
}

impl BackendError {
    /// Route53 error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoSuchHostedZone(_) => "NoSuchHostedZone",
            Self::HostedZoneAlreadyExists(_) => "HostedZoneAlreadyExists",
            Self::HostedZoneNotEmpty(_) => "HostedZoneNotEmpty",
            Self::InvalidDomainName(_) => "InvalidDomainName",
            Self::InvalidInput(_) => "InvalidInput",
            Self::InvalidChangeBatch(_) => "InvalidChangeBatch",
            Self::NoSuchChange(_) => "NoSuchChange",
            Self::NoSuchHealthCheck(_) => "NoSuchHealthCheck",
            Self::HealthCheckAlreadyExists(_) => "HealthCheckAlreadyExists",
            Self::HealthCheckInUse(_) => "HealthCheckInUse",
        }
    }

    /// HTTP status the error is returned with.
    pub const fn status(&self) -> u16 {
        match self {
            Self::NoSuchHostedZone(_) | Self::NoSuchChange(_) | Self::NoSuchHealthCheck(_) => 404,
            Self::HostedZoneAlreadyExists(_) | Self::HealthCheckAlreadyExists(_) => 409,
            Self::HostedZoneNotEmpty(_)
            | Self::InvalidDomainName(_)
            | Self::InvalidInput(_)
            | Self::InvalidChangeBatch(_)
            | Self::HealthCheckInUse(_) => 400,
        }
    }

    /// Returns true for the `NoSuch*` family.
    pub const fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}
