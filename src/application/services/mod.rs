//! Business logic services for the application layer.

pub mod auth_service;
pub mod comment_service;
pub mod review_service;
pub mod taxonomy_service;
pub mod title_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthSettings, Claims};
pub use comment_service::CommentService;
pub use review_service::ReviewService;
pub use taxonomy_service::TaxonomyService;
pub use title_service::{TitleDraft, TitleDraftPatch, TitleService};
pub use user_service::UserService;
