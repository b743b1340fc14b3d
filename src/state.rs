//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, AuthSettings, CommentService, ReviewService, TaxonomyService, TitleService,
    UserService,
};
use crate::domain::repositories::{
    CommentRepository, HealthRepository, ReviewRepository, TaxonomyRepository, TitleRepository,
    UserRepository,
};
use crate::infrastructure::mail::Mailer;
use crate::infrastructure::persistence::{
    PgCommentRepository, PgHealthRepository, PgReviewRepository, PgTaxonomyRepository,
    PgTitleRepository, PgUserRepository,
};

/// Storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub taxonomy: Arc<dyn TaxonomyRepository>,
    pub titles: Arc<dyn TitleRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub health: Arc<dyn HealthRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            taxonomy: Arc::new(PgTaxonomyRepository::new(pool.clone())),
            titles: Arc::new(PgTitleRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            health: Arc::new(PgHealthRepository::new(pool)),
        }
    }
}

pub type DynAuthService = AuthService<dyn UserRepository, dyn Mailer>;
pub type DynTitleService = TitleService<dyn TitleRepository, dyn TaxonomyRepository>;
pub type DynReviewService = ReviewService<dyn ReviewRepository, dyn TitleRepository>;
pub type DynCommentService = CommentService<dyn CommentRepository, dyn ReviewRepository>;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<DynAuthService>,
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub taxonomy_service: Arc<TaxonomyService<dyn TaxonomyRepository>>,
    pub title_service: Arc<DynTitleService>,
    pub review_service: Arc<DynReviewService>,
    pub comment_service: Arc<DynCommentService>,
    pub health: Arc<dyn HealthRepository>,
}

impl AppState {
    pub fn new(repos: Repositories, mailer: Arc<dyn Mailer>, auth: AuthSettings) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(repos.users.clone(), mailer, auth)),
            user_service: Arc::new(UserService::new(repos.users)),
            taxonomy_service: Arc::new(TaxonomyService::new(repos.taxonomy.clone())),
            title_service: Arc::new(TitleService::new(repos.titles.clone(), repos.taxonomy)),
            review_service: Arc::new(ReviewService::new(
                repos.reviews.clone(),
                repos.titles,
            )),
            comment_service: Arc::new(CommentService::new(repos.comments, repos.reviews)),
            health: repos.health,
        }
    }
}
