pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod models;
pub mod notify;
pub mod pages;
pub mod registration;
pub mod validation;
pub mod view;

pub use api::JobBoardApi;
pub use config::{DevJobsConfig, SessionStore};
pub use context::{Action, AppContext};
pub use error::{DevJobsError, FailureKind, FetchError, Result};
pub use fetch::{FetchController, FetchState, ListFetchController, ResolutionOrder};
pub use models::{
    AccountKind, AuthToken, BasicUserProfile, DashboardSummary, Job, JobId, Listing, Session,
    UserProfile,
};
pub use notify::{Detail, Notification, NotificationLog, Notifier};
pub use pages::{Deps, EmployerDashboard, JobListPage, JobSeekerRegistration, ProfilePage, SignupPage};
pub use registration::{Registration, Step};
pub use validation::{JobPosting, LoginForm, ProfileUpdate, SignupForm, Validate, ValidationErrors};
pub use view::{JobCard, ListRegion, Placeholder};
