/// Router Module Index
///
/// Organizes the application's routing into modules matching the three
/// authorization outcomes of the access policy. The policy itself is enforced
/// centrally by the middleware in `lib.rs`; this split keeps each route's
/// intended access level visible at the point where it is registered.

/// Routes in the policy's public block (pages, /cats, the login flow).
pub mod public;

/// The ops surface under `/actuator`, public per the policy.
pub mod actuator;

/// The `/privileged/**` subtree, restricted to the DOG and ADMIN roles.
pub mod privileged;
