//! Page models: each page owns its fetch lifecycle and reports through the
//! installed notifier
//!
//! Pages hold no terminal state. A front-end mounts a page, renders
//! [`JobListPage::view`] (or the page's equivalent) whenever the controller's
//! watch channel changes, and forwards user intents (refresh, submit).

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::api::JobBoardApi;
use crate::context::{Action, AppContext};
use crate::error::{DevJobsError, FetchError, Result};
use crate::fetch::{FetchController, FetchState, ListFetchController, ResolutionOrder};
use crate::models::{or_na, AccountKind, DashboardSummary, Job, Listing, Session, UserProfile};
use crate::notify::{fetch_failed, Detail, Notification, Notifier, SUBMIT_FAILED};
use crate::registration::{Event, Registration, Step, TransitionError};
use crate::validation::{JobPosting, LoginForm, ProfileUpdate, SignupForm, Validate};
use crate::view::{render_dashboard, render_jobs, DashboardView, JobCard, ListRegion, Placeholder};

pub const JOB_POSTED: &str = "Job posted successfully";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const REGISTRATION_SUCCESSFUL: &str = "Registration Successful";
pub const CONFIRMATION_SENT: &str = "A confirmation Email has been sent to your email address";
pub const LOGIN_SUCCESSFUL: &str = "Login Successful";

/// Everything a page needs from the outside.
#[derive(Clone)]
pub struct Deps {
    pub api: Arc<dyn JobBoardApi>,
    pub notifier: Arc<dyn Notifier>,
    pub context: AppContext,
    pub detail: Detail,
    pub order: ResolutionOrder,
}

impl Deps {
    pub fn new(api: Arc<dyn JobBoardApi>, notifier: Arc<dyn Notifier>, context: AppContext) -> Self {
        Self {
            api,
            notifier,
            context,
            detail: Detail::default(),
            order: ResolutionOrder::default(),
        }
    }

    pub fn detail(mut self, detail: Detail) -> Self {
        self.detail = detail;
        self
    }

    pub fn order(mut self, order: ResolutionOrder) -> Self {
        self.order = order;
        self
    }

    /// Send the current session's token with subsequent calls.
    fn authorize(&self) {
        self.api.set_auth(self.context.session().as_ref());
    }

    fn submit_failed(&self, cause: &FetchError) {
        warn!(kind = ?cause.kind(), error = %cause, "submission failed");
        self.notifier.notify(Notification::error(SUBMIT_FAILED));
    }
}

impl fmt::Debug for Deps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deps")
            .field("context", &self.context)
            .field("detail", &self.detail)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Home and landing pages: the job listing with a refresh action.
pub struct JobListPage {
    controller: ListFetchController<Job>,
    placeholder: Placeholder,
}

impl JobListPage {
    /// Home page: spinner while loading.
    pub fn home(deps: &Deps) -> Self {
        Self::mount(deps, Placeholder::Spinner)
    }

    /// Landing page: "Loading please wait" while loading.
    pub fn landing(deps: &Deps) -> Self {
        Self::mount(deps, Placeholder::LANDING)
    }

    fn mount(deps: &Deps, placeholder: Placeholder) -> Self {
        let api = Arc::clone(&deps.api);
        let controller = FetchController::builder(move || {
            let api = Arc::clone(&api);
            async move { api.get_jobs().await }
        })
        .subject("jobs")
        .notifier(Arc::clone(&deps.notifier))
        .detail(deps.detail)
        .order(deps.order)
        .mount();
        Self {
            controller,
            placeholder,
        }
    }

    /// "See more jobs".
    pub fn refresh(&self) {
        self.controller.refresh();
    }

    pub fn view(&self) -> ListRegion<JobCard> {
        render_jobs(&self.controller.state(), self.placeholder)
    }

    /// Wait for outstanding fetches, then render.
    pub async fn settled_view(&self) -> ListRegion<JobCard> {
        render_jobs(&self.controller.settled().await, self.placeholder)
    }

    pub fn jobs(&self) -> Listing<Job> {
        self.controller.state().items
    }

    pub fn controller(&self) -> &ListFetchController<Job> {
        &self.controller
    }
}

/// Employer dashboard: counters plus job posting.
pub struct EmployerDashboard {
    controller: FetchController<DashboardSummary>,
    deps: Deps,
}

impl EmployerDashboard {
    /// Uses the summary cached in the context when there is one; fetches otherwise.
    pub fn mount(deps: &Deps) -> Self {
        deps.authorize();
        let api = Arc::clone(&deps.api);
        let context = deps.context.clone();
        let builder = FetchController::builder(move || {
            let api = Arc::clone(&api);
            async move { api.get_employer_dashboard().await }
        })
        .subject("dashboard")
        .notifier(Arc::clone(&deps.notifier))
        .detail(deps.detail)
        .order(deps.order)
        .on_loaded(move |summary: &DashboardSummary| {
            context.dispatch(Action::SetNotifications(summary.clone()));
        });

        let controller = match deps.context.notifications() {
            Some(cached) => builder.preloaded(cached).build(),
            None => builder.mount(),
        };
        Self {
            controller,
            deps: deps.clone(),
        }
    }

    pub fn refresh(&self) {
        self.deps.authorize();
        self.controller.refresh();
    }

    pub fn view(&self) -> DashboardView {
        render_dashboard(&self.controller.state())
    }

    pub async fn settled_view(&self) -> DashboardView {
        render_dashboard(&self.controller.settled().await)
    }

    pub fn state(&self) -> FetchState<DashboardSummary> {
        self.controller.state()
    }

    pub fn controller(&self) -> &FetchController<DashboardSummary> {
        &self.controller
    }

    pub async fn post_job(&self, job: &JobPosting) -> Result<()> {
        post_job(&self.deps, job).await
    }
}

/// Validate and submit a job posting as the logged-in employer.
#[instrument(skip_all, fields(title = %job.title))]
pub async fn post_job(deps: &Deps, job: &JobPosting) -> Result<()> {
    job.validate()?;
    deps.authorize();
    match deps.api.create_job(job).await {
        Ok(_) => {
            info!("job posted");
            deps.notifier.notify(Notification::success(JOB_POSTED));
            Ok(())
        }
        Err(cause) => {
            deps.submit_failed(&cause);
            Err(cause.into())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStage {
    Form,
    Completed,
}

pub struct SignupPage {
    deps: Deps,
    kind: AccountKind,
    stage: SignupStage,
}

impl SignupPage {
    pub fn new(deps: &Deps, kind: AccountKind) -> Self {
        Self {
            deps: deps.clone(),
            kind,
            stage: SignupStage::Form,
        }
    }

    pub fn stage(&self) -> SignupStage {
        self.stage
    }

    /// Register the account and keep its session in the context.
    #[instrument(skip_all, fields(username = %form.username))]
    pub async fn submit(&mut self, form: &SignupForm) -> Result<Session> {
        form.validate()?;
        match self.deps.api.register_user(form).await {
            Ok(token) => {
                let mut session = Session::new(token, self.kind);
                session.username = Some(form.username.clone());
                self.deps.notifier.notify(Notification::success(REGISTRATION_SUCCESSFUL));
                self.deps.context.dispatch(Action::SetSession(session.clone()));
                self.deps.authorize();
                self.stage = SignupStage::Completed;
                self.deps.notifier.notify(Notification::success(CONFIRMATION_SENT));
                Ok(session)
            }
            Err(cause) => {
                match signup_rejection(&cause) {
                    Some(message) => {
                        warn!(status = ?cause.status(), "registration rejected");
                        self.deps.notifier.notify(Notification::error(message));
                    }
                    None => self.deps.submit_failed(&cause),
                }
                Err(cause.into())
            }
        }
    }
}

/// The message to show for a 400 from the registration endpoint.
fn signup_rejection(cause: &FetchError) -> Option<String> {
    if cause.status() != Some(400) {
        return None;
    }
    cause
        .field_error(&["username", "password1"])
        .or_else(|| cause.any_field_error())
}

/// Log in and keep the session in the context.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn log_in(deps: &Deps, form: &LoginForm, kind: AccountKind) -> Result<Session> {
    form.validate()?;
    match deps.api.login(form).await {
        Ok(token) => {
            let mut session = Session::new(token, kind);
            session.username = Some(form.username.clone());
            deps.context.dispatch(Action::SetSession(session.clone()));
            deps.authorize();
            deps.notifier.notify(Notification::success(LOGIN_SUCCESSFUL));
            Ok(session)
        }
        Err(cause) => {
            let message = cause
                .field_error(&["non_field_errors"])
                .unwrap_or_else(|| SUBMIT_FAILED.to_string());
            warn!(kind = ?cause.kind(), error = %cause, "login failed");
            deps.notifier.notify(Notification::error(message));
            Err(cause.into())
        }
    }
}

pub fn log_out(deps: &Deps) {
    deps.context.dispatch(Action::LogOut);
    deps.api.set_auth(None);
    deps.notifier.notify(Notification::info("Logged out"));
}

/// What the profile page shows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProfileView {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub about: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
    pub instagram: String,
    pub stack: String,
    pub experience_level: String,
    pub salary: String,
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User Name : {}", self.username)?;
        writeln!(f, "First Name : {}", self.first_name)?;
        writeln!(f, "Last Name : {}", self.last_name)?;
        writeln!(f, "email : {}", self.email)?;
        writeln!(f)?;
        writeln!(f, "About Me")?;
        writeln!(f, "  {}", self.about)?;
        writeln!(f)?;
        writeln!(f, "Contact Information")?;
        writeln!(f, "  Email : {}", self.email)?;
        writeln!(f, "  Github : {}", self.github)?;
        writeln!(f, "  LinkedIn : {}", self.linkedin)?;
        writeln!(f, "  Twitter : {}", self.twitter)?;
        writeln!(f, "  Instagram : {}", self.instagram)?;
        writeln!(f)?;
        writeln!(f, "Stack/Role Information")?;
        writeln!(f, "  Stack, Dev Role : {}", self.stack)?;
        writeln!(f, "  Experience Level : {}", self.experience_level)?;
        write!(f, "  Salary/Pay Range : {}", self.salary)
    }
}

pub struct ProfilePage {
    deps: Deps,
}

impl ProfilePage {
    pub fn new(deps: &Deps) -> Self {
        Self { deps: deps.clone() }
    }

    /// Fetch the account record unless the context already has it.
    #[instrument(skip_all)]
    pub async fn load(&self) -> ProfileView {
        if self.deps.context.basic_profile().is_none() {
            self.deps.authorize();
            match self.deps.api.get_basic_user_profile().await {
                Ok(profile) => self.deps.context.dispatch(Action::SetBasicProfile(profile)),
                Err(cause) => {
                    warn!(kind = ?cause.kind(), error = %cause, "profile fetch failed");
                    self.deps.notifier.notify(Notification::error(fetch_failed(
                        "profile",
                        &cause,
                        self.deps.detail,
                    )));
                }
            }
        }
        self.view()
    }

    /// Full profile fields first, then the account record, then `N/A`.
    pub fn view(&self) -> ProfileView {
        let basic = self.deps.context.basic_profile().unwrap_or_default();
        let full = self.deps.context.full_profile().unwrap_or_default();
        let pick = |primary: &Option<String>, fallback: Option<&str>| -> String {
            let primary = primary.as_deref().filter(|v| !v.trim().is_empty());
            or_na(primary.or(fallback)).to_string()
        };
        ProfileView {
            username: pick(&full.user, Some(basic.username.as_str())),
            first_name: pick(&full.first_name, basic.first_name.as_deref()),
            last_name: pick(&full.last_name, basic.last_name.as_deref()),
            email: pick(&full.email, Some(basic.email.as_str())),
            about: pick(&full.about, None),
            github: pick(&full.github, None),
            linkedin: pick(&full.linkedin_profile, None),
            twitter: pick(&full.twitter, None),
            instagram: pick(&full.instagram, None),
            stack: pick(&full.stack_dev_role, None),
            experience_level: pick(&full.experience_level, None),
            salary: pick(&full.salary, None),
        }
    }

    #[instrument(skip_all)]
    pub async fn update(&self, profile: &ProfileUpdate) -> Result<UserProfile> {
        profile.validate()?;
        self.deps.authorize();
        match self.deps.api.update_user_profile(profile).await {
            Ok(saved) => {
                self.deps.context.dispatch(Action::SetFullProfile(saved.clone()));
                self.deps.notifier.notify(Notification::success(PROFILE_UPDATED));
                Ok(saved)
            }
            Err(cause) => {
                self.deps.submit_failed(&cause);
                Err(cause.into())
            }
        }
    }
}

/// The job seeker registration wizard wired to the backend.
pub struct JobSeekerRegistration {
    deps: Deps,
    machine: Registration,
}

impl JobSeekerRegistration {
    pub fn new(deps: &Deps) -> Self {
        Self {
            deps: deps.clone(),
            machine: Registration::new(),
        }
    }

    pub fn machine(&self) -> &Registration {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Registration {
        &mut self.machine
    }

    pub fn step(&self) -> Step {
        self.machine.step()
    }

    pub fn next(&mut self) -> Result<Step> {
        Ok(self.machine.apply(Event::Next)?)
    }

    pub fn back(&mut self) -> Result<Step> {
        Ok(self.machine.apply(Event::Back)?)
    }

    /// Save the collected profile and move to `Complete`.
    ///
    /// The machine stays on the resume step if validation or the request fails.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> Result<UserProfile> {
        if self.machine.step() != Step::ResumeUpload {
            return Err(TransitionError {
                from: self.machine.step(),
                event: Event::Submit,
            }
            .into());
        }
        let profile = self.machine.draft.to_profile();
        profile.validate()?;
        if !self.deps.context.is_authenticated() {
            return Err(DevJobsError::NotAuthenticated);
        }

        self.machine.set_loading(true);
        self.deps.authorize();
        let outcome = self.deps.api.update_user_profile(&profile).await;
        self.machine.set_loading(false);

        match outcome {
            Ok(saved) => {
                self.machine.apply(Event::Submit)?;
                self.deps.context.dispatch(Action::SetFullProfile(saved.clone()));
                self.deps.notifier.notify(Notification::success(PROFILE_UPDATED));
                Ok(saved)
            }
            Err(cause) => {
                self.deps.submit_failed(&cause);
                Err(cause.into())
            }
        }
    }
}
