//! Remote operations the pages depend on

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::models::{AuthToken, BasicUserProfile, DashboardSummary, Job, Listing, Session, UserProfile};
use crate::validation::{JobPosting, LoginForm, ProfileUpdate, SignupForm};

/// The DevJobs backend as seen from the pages.
///
/// Every call resolves to a payload or one of the three [`FetchError`]
/// causes; implementations never panic on transport failures.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    /// Attach (or drop) the token sent with later calls.
    fn set_auth(&self, session: Option<&Session>);

    async fn get_jobs(&self) -> Result<Listing<Job>, FetchError>;

    async fn get_employer_dashboard(&self) -> Result<DashboardSummary, FetchError>;

    async fn create_job(&self, job: &JobPosting) -> Result<Value, FetchError>;

    async fn register_user(&self, form: &SignupForm) -> Result<AuthToken, FetchError>;

    async fn login(&self, form: &LoginForm) -> Result<AuthToken, FetchError>;

    async fn get_basic_user_profile(&self) -> Result<BasicUserProfile, FetchError>;

    async fn update_user_profile(&self, profile: &ProfileUpdate) -> Result<UserProfile, FetchError>;
}
