// SPDX-License-Identifier: MIT

pub use scanio::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsParsingError {
    IO(ScanIOError),
    Unsupported,
    Corrupted,
    Invalid(&'static str),
    Other(&'static str),
}

impl FsParsingError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsParsingError::IO(_) => "IO error",
            FsParsingError::Unsupported => "Unsupported filesystem",
            FsParsingError::Corrupted => "Corrupted boot sector",
            FsParsingError::Invalid(msg) => msg,
            FsParsingError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsParsingError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFormatterError {
    IO(ScanIOError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsFormatterError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsFormatterError::IO(_) => "IO error",
            FsFormatterError::Invalid(msg) => msg,
            FsFormatterError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsFormatterError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

/// Failures while writing a repair back to the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsRepairError {
    IO(ScanIOError),
    /// No empty or deleted slot left in the target directory.
    DirectoryFull,
    Invalid(&'static str),
    Other(&'static str),
}

impl FsRepairError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsRepairError::IO(_) => "IO error",
            FsRepairError::DirectoryFull => "No free directory slot left",
            FsRepairError::Invalid(msg) => msg,
            FsRepairError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsRepairError::IO(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCheckerError {
    IO(ScanIOError),
    Parsing(FsParsingError),
    Repair(FsRepairError),
    Invalid(&'static str),
    Other(&'static str),
}

impl FsCheckerError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsCheckerError::IO(_) => "IO error",
            FsCheckerError::Parsing(_) => "Parsing error",
            FsCheckerError::Repair(_) => "Repair failed",
            FsCheckerError::Invalid(msg) => msg,
            FsCheckerError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsCheckerError::IO(e) => Some(FsError::IO(*e)),
            FsCheckerError::Parsing(e) => Some(FsError::Parsing(*e)),
            FsCheckerError::Repair(e) => Some(FsError::Repair(*e)),
            _ => None,
        }
    }
}

/// Top-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    IO(ScanIOError),
    Parsing(FsParsingError),
    Formatter(FsFormatterError),
    Repair(FsRepairError),
    Checker(FsCheckerError),
    Other(&'static str),
}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::IO(e) => e.msg(),
            FsError::Parsing(e) => e.msg(),
            FsError::Formatter(e) => e.msg(),
            FsError::Repair(e) => e.msg(),
            FsError::Checker(e) => e.msg(),
            FsError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsError::Parsing(e) => e.source(),
            FsError::Formatter(e) => e.source(),
            FsError::Repair(e) => e.source(),
            FsError::Checker(e) => e.source(),
            FsError::IO(_) => None,
            FsError::Other(_) => None,
        }
    }
}

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsParsingResult<T = ()> = Result<T, FsParsingError>;
pub type FsFormatterResult<T = ()> = Result<T, FsFormatterError>;
pub type FsRepairResult<T = ()> = Result<T, FsRepairError>;
pub type FsCheckerResult<T = ()> = Result<T, FsCheckerError>;

crate::__impl_chain_display!(
    FsParsingError,
    FsFormatterError,
    FsRepairError,
    FsCheckerError,
    FsError,
);

crate::fs_error_wiring! {
    top => FsError {
        ScanIOError      : IO,
        FsParsingError   : Parsing,
        FsFormatterError : Formatter,
        FsRepairError    : Repair,
        FsCheckerError   : Checker,
    },
    str_into => [
        FsParsingError,
        FsFormatterError,
        FsRepairError,
        FsCheckerError,
    ],
    sub => {
        ScanIOError    => [ FsParsingError::IO, FsFormatterError::IO, FsRepairError::IO, FsCheckerError::IO ],
        FsParsingError => [ FsCheckerError::Parsing ],
        FsRepairError  => [ FsCheckerError::Repair ],
    },
}
