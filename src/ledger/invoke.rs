//! Dispatch of contract functions invoked by name.
//!
//! The ledger runtime calls contract functions with a function name and a
//! list of string arguments. [`Invocation::parse`] turns that pair into a
//! typed call, and [`ReadingContract::invoke`] runs it and produces a
//! [`Response`] whose JSON form is the transaction payload.

use serde::Serialize;

use crate::logging::debug;

use super::contract::ReadingContract;
use super::error::ContractError;
use super::stub::ChaincodeStub;
use super::types::Reading;

/// A parsed contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    InitLedger,
    CreateReading {
        id: String,
        cycle: i64,
        consumed: i64,
        injected: i64,
    },
    ReadReading {
        id: String,
    },
    GetAllReadings,
    ReadingExists {
        id: String,
    },
}

impl Invocation {
    /// Names of the functions the contract exports.
    pub const FUNCTIONS: [&'static str; 5] = [
        "InitLedger",
        "CreateReading",
        "ReadReading",
        "GetAllReadings",
        "ReadingExists",
    ];

    /// Parse a function name and its string arguments.
    pub fn parse<A: AsRef<str>>(function: &str, args: &[A]) -> Result<Self, ContractError> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

        match function {
            "InitLedger" => {
                expect_arity(function, &args, 0)?;
                Ok(Self::InitLedger)
            }
            "CreateReading" => match args.as_slice() {
                [id, cycle, consumed, injected] => Ok(Self::CreateReading {
                    id: id.to_string(),
                    cycle: parse_int(function, "cycle", cycle)?,
                    consumed: parse_int(function, "consumed", consumed)?,
                    injected: parse_int(function, "injected", injected)?,
                }),
                _ => Err(arity_error(function, args.len(), 4)),
            },
            "ReadReading" => match args.as_slice() {
                [id] => Ok(Self::ReadReading { id: id.to_string() }),
                _ => Err(arity_error(function, args.len(), 1)),
            },
            "GetAllReadings" => {
                expect_arity(function, &args, 0)?;
                Ok(Self::GetAllReadings)
            }
            "ReadingExists" => match args.as_slice() {
                [id] => Ok(Self::ReadingExists { id: id.to_string() }),
                _ => Err(arity_error(function, args.len(), 1)),
            },
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }

    /// Name of the function this call invokes.
    pub fn function(&self) -> &'static str {
        match self {
            Self::InitLedger => "InitLedger",
            Self::CreateReading { .. } => "CreateReading",
            Self::ReadReading { .. } => "ReadReading",
            Self::GetAllReadings => "GetAllReadings",
            Self::ReadingExists { .. } => "ReadingExists",
        }
    }
}

/// Result of a contract call.
///
/// Serializes to the payload returned to the caller: nothing for
/// `InitLedger`, the reading, the array of readings, or a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Empty,
    Reading(Reading),
    Readings(Vec<Reading>),
    Exists(bool),
}

impl Response {
    /// JSON payload bytes. `Empty` produces an empty payload.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Empty => Ok(Vec::new()),
            other => serde_json::to_vec(other),
        }
    }
}

impl ReadingContract {
    /// Run a parsed call against the given world state.
    pub fn invoke<S>(&self, stub: &S, invocation: Invocation) -> Result<Response, ContractError>
    where
        S: ChaincodeStub + ?Sized,
    {
        debug!(function = invocation.function(), "invoking contract function");

        match invocation {
            Invocation::InitLedger => self.init_ledger(stub).map(|()| Response::Empty),
            Invocation::CreateReading {
                id,
                cycle,
                consumed,
                injected,
            } => self
                .create_reading(stub, &id, cycle, consumed, injected)
                .map(Response::Reading),
            Invocation::ReadReading { id } => self.read_reading(stub, &id).map(Response::Reading),
            Invocation::GetAllReadings => self.get_all_readings(stub).map(Response::Readings),
            Invocation::ReadingExists { id } => {
                self.reading_exists(stub, &id).map(Response::Exists)
            }
        }
    }
}

fn expect_arity(function: &str, args: &[&str], expected: usize) -> Result<(), ContractError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(arity_error(function, args.len(), expected))
    }
}

fn arity_error(function: &str, got: usize, expected: usize) -> ContractError {
    ContractError::invalid_arguments(
        function,
        format!("expected {} argument(s), got {}", expected, got),
    )
}

fn parse_int(function: &str, name: &str, value: &str) -> Result<i64, ContractError> {
    value.parse().map_err(|e| {
        ContractError::invalid_arguments(function, format!("{} '{}': {}", name, value, e))
    })
}
