//! Domain primitives, ports and services.
//!
//! Purpose: define the user entity, the transport-agnostic error type and the
//! use-case ports the HTTP adapter drives. Keep types immutable outside their
//! documented mutators and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: domain failure payload and stable identifier.
//! - User, NewUser and their field newtypes.
//! - UserService: implementation of the user driving ports.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, NewUser, User, UserId, UserName, UserValidationError};
pub use self::user_service::{UserService, map_validation_error};
