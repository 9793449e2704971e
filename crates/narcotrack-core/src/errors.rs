//! Error facility for narcotrack
//!
//! Every store-affecting operation signals failure through [`TrackerError`].
//! Each error carries a [`TrackerErrorKind`] with a stable `ERR_*` code for
//! programmatic handling, plus optional context (operation, medication code,
//! adjustment id, reporting period id) for diagnostics.

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable in tests and scripts that
/// match on failures rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerErrorKind {
    // Input validation
    InvalidInput,
    InvalidCode,
    InvalidUnit,
    ConversionOverflow,

    // Record state
    NotFound,
    AlreadyExists,
    ConstraintViolation,

    // Command gateway
    /// `execute()` was invoked on a command that already ran
    InvalidCommandState,

    // Inventory discipline
    /// The adjustment would drive a medication's balance below zero
    InsufficientStock,
    /// No reporting period is open to receive the adjustment
    NoOpenPeriod,
    /// The targeted reporting period has been closed
    PeriodClosed,

    // Store/IO
    /// The database file cannot be opened or is not a database
    StoreUnavailable,
    Persistence,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl TrackerErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            TrackerErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            TrackerErrorKind::InvalidCode => "ERR_INVALID_CODE",
            TrackerErrorKind::InvalidUnit => "ERR_INVALID_UNIT",
            TrackerErrorKind::ConversionOverflow => "ERR_CONVERSION_OVERFLOW",
            TrackerErrorKind::NotFound => "ERR_NOT_FOUND",
            TrackerErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            TrackerErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            TrackerErrorKind::InvalidCommandState => "ERR_INVALID_COMMAND_STATE",
            TrackerErrorKind::InsufficientStock => "ERR_INSUFFICIENT_STOCK",
            TrackerErrorKind::NoOpenPeriod => "ERR_NO_OPEN_PERIOD",
            TrackerErrorKind::PeriodClosed => "ERR_PERIOD_CLOSED",
            TrackerErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            TrackerErrorKind::Persistence => "ERR_PERSISTENCE",
            TrackerErrorKind::Serialization => "ERR_SERIALIZATION",
            TrackerErrorKind::Io => "ERR_IO",
            TrackerErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Built with the `with_*` chain; consumed through `kind()`/`code()` or the
/// `Display` rendering.
#[derive(Debug, Clone)]
pub struct TrackerError {
    kind: TrackerErrorKind,
    op: Option<String>,
    medication_code: Option<String>,
    adjustment_id: Option<String>,
    period_id: Option<i64>,
    message: String,
    source: Option<Box<TrackerError>>,
}

impl TrackerError {
    /// Create a new error with the specified kind
    pub fn new(kind: TrackerErrorKind) -> Self {
        Self {
            kind,
            op: None,
            medication_code: None,
            adjustment_id: None,
            period_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add medication code context
    pub fn with_medication(mut self, code: impl Into<String>) -> Self {
        self.medication_code = Some(code.into());
        self
    }

    /// Add adjustment id context
    pub fn with_adjustment(mut self, id: impl Into<String>) -> Self {
        self.adjustment_id = Some(id.into());
        self
    }

    /// Add reporting period context
    pub fn with_period(mut self, period_id: i64) -> Self {
        self.period_id = Some(period_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: TrackerError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> TrackerErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the medication code context, if any
    pub fn medication_code(&self) -> Option<&str> {
        self.medication_code.as_deref()
    }

    /// Get the adjustment id context, if any
    pub fn adjustment_id(&self) -> Option<&str> {
        self.adjustment_id.as_deref()
    }

    /// Get the reporting period context, if any
    pub fn period_id(&self) -> Option<i64> {
        self.period_id
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&TrackerError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(code) = &self.medication_code {
            write!(f, " (medication: {})", code)?;
        }
        if let Some(id) = &self.adjustment_id {
            write!(f, " (adjustment: {})", id)?;
        }
        if let Some(period_id) = self.period_id {
            write!(f, " (period: {})", period_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}
