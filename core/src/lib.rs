//! API gateway and presentation core for the pet-store front end.
//!
//! # Overview
//! `PetstoreClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `PetGateway`
//! runs those requests through a `Transport` and returns `GatewayResult`s;
//! `mapper` and `ordering` turn upstream records into display rows.
//!
//! # Design
//! - `PetstoreClient` is stateless; it holds only `base_url`.
//! - Every upstream failure is a `GatewayError`, never a panic.
//! - `Transport` is the I/O seam: `ReqwestTransport` in production, a
//!   recording fake in tests.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mapper;
pub mod ordering;
pub mod transport;
pub mod types;

pub use client::{PetstoreClient, API_KEY_HEADER};
pub use error::{ErrorEnvelope, GatewayError, GatewayResult};
pub use gateway::PetGateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartBody, RequestBody};
pub use mapper::{payload_from_form, PetView};
pub use ordering::{sort_pets, SortDirection, SortKey};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{
    ApiMessage, Category, NameRef, PetForm, PetPayload, PetStatus, RawPet, Tag, UploadOutcome,
};
