//! Domain layer: value objects, entities, and the traits the outer layers implement.

pub mod collaborator;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use collaborator::{Profile, ProfileLookup, RoomGate, TokenVerifier};
pub use entity::{Participant, Room, Session, session_targets};
pub use error::{
    AuthError, MessagePushError, ProfileError, RepositoryError, RoomAccessError, ValueObjectError,
};
pub use event::PresenceEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::PresenceRepository;
pub use value_object::{
    AvatarRef, DisplayName, MessageContent, NegotiationPayload, Position, RoomId, SessionId,
    SessionIdFactory, Timestamp, UserId,
};
