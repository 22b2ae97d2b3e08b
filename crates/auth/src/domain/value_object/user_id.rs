use kernel::id::Id;

/// Marker for user IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;

/// Opaque user identifier (UUID v4), assigned by the store on creation
pub type UserId = Id<UserMarker>;
