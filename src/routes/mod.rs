//! Routes are split by the access level enforced at the router layer. Fine-grained
//! checks (owner-or-admin, self-or-admin) run in the services.

/// Anonymous, read-only routes plus the token endpoint.
pub mod public;

/// Routes behind the `AuthUser` extractor middleware: any active user.
pub mod authenticated;

/// Routes that additionally require the ADMIN role.
pub mod admin;
