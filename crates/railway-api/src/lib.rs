//! Async client for the Railway GraphQL API plus a plain HTTP prober for
//! deployed services.

pub mod client;
pub mod deployment;
pub mod graphql;
pub mod project;
pub mod viewer;

pub use client::{ApiError, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, RailwayClient, error_chain};
pub use deployment::{DeploymentClient, DeploymentProbe, status_is_ok};
pub use graphql::{GraphQlError, GraphQlErrors, PathSegment};
pub use project::{Project, Service, ServiceConnection, ServiceEdge};
pub use viewer::Viewer;
