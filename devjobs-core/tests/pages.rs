//! Page behaviour against an in-memory backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use devjobs_core::api::JobBoardApi;
use devjobs_core::models::{
    AccountKind, AuthToken, BasicUserProfile, DashboardSummary, Job, Listing, Session, UserProfile,
};
use devjobs_core::notify::{Level, SUBMIT_FAILED};
use devjobs_core::pages::{
    log_in, log_out, Deps, EmployerDashboard, JobListPage, JobSeekerRegistration, ProfilePage,
    SignupPage, SignupStage, CONFIRMATION_SENT, JOB_POSTED, REGISTRATION_SUCCESSFUL,
};
use devjobs_core::registration::Step;
use devjobs_core::validation::{JobPosting, LoginForm, ProfileUpdate, SignupForm};
use devjobs_core::view::DashboardView;
use devjobs_core::{AppContext, DevJobsError, FetchError, NotificationLog};
use serde_json::{json, Value};

#[derive(Default)]
struct FakeBackend {
    jobs: Mutex<Option<Result<Listing<Job>, FetchError>>>,
    dashboard: Mutex<Option<Result<DashboardSummary, FetchError>>>,
    registration: Mutex<Option<Result<AuthToken, FetchError>>>,
    create_job: Mutex<Option<Result<Value, FetchError>>>,
    profile_update: Mutex<Option<Result<UserProfile, FetchError>>>,
    auth: Mutex<Option<String>>,
    dashboard_calls: AtomicUsize,
}

fn take<T: Clone>(slot: &Mutex<Option<Result<T, FetchError>>>) -> Result<T, FetchError> {
    slot.lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| Err(FetchError::request_setup("not scripted")))
}

#[async_trait]
impl JobBoardApi for FakeBackend {
    fn set_auth(&self, session: Option<&Session>) {
        *self.auth.lock().unwrap() = session.map(Session::authorization);
    }

    async fn get_jobs(&self) -> Result<Listing<Job>, FetchError> {
        take(&self.jobs)
    }

    async fn get_employer_dashboard(&self) -> Result<DashboardSummary, FetchError> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        take(&self.dashboard)
    }

    async fn create_job(&self, _job: &JobPosting) -> Result<Value, FetchError> {
        take(&self.create_job)
    }

    async fn register_user(&self, _form: &SignupForm) -> Result<AuthToken, FetchError> {
        take(&self.registration)
    }

    async fn login(&self, form: &LoginForm) -> Result<AuthToken, FetchError> {
        if form.password == "correct horse" {
            Ok(AuthToken {
                key: "login-token".into(),
            })
        } else {
            Err(FetchError::response(
                400,
                Some(json!({"non_field_errors": ["Unable to log in with provided credentials."]})),
            ))
        }
    }

    async fn get_basic_user_profile(&self) -> Result<BasicUserProfile, FetchError> {
        Ok(BasicUserProfile {
            pk: Some(1),
            username: "ada".into(),
            email: "ada@example.com".into(),
            first_name: Some("Ada".into()),
            last_name: None,
        })
    }

    async fn update_user_profile(&self, _profile: &ProfileUpdate) -> Result<UserProfile, FetchError> {
        take(&self.profile_update)
    }
}

fn deps(backend: &Arc<FakeBackend>, log: &NotificationLog, ctx: &AppContext) -> Deps {
    Deps::new(backend.clone(), Arc::new(log.clone()), ctx.clone())
}

fn employer() -> Session {
    Session::new(
        AuthToken {
            key: "emp".into(),
        },
        AccountKind::Employer,
    )
}

fn posting() -> JobPosting {
    JobPosting {
        company_number: "0800".into(),
        company_name: "Acme".into(),
        company_email: "hr@acme.example".into(),
        company_website: "https://acme.example".into(),
        country: "Nigeria".into(),
        state: "Lagos".into(),
        city: "Ikeja".into(),
        title: "Engineer".into(),
        description: "Build things".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn home_page_renders_jobs_after_mount() {
    let backend = Arc::new(FakeBackend::default());
    *backend.jobs.lock().unwrap() = Some(Ok(serde_json::from_value(json!([
        {"pk": 1, "title": "Engineer", "company_name": "Acme", "users_applied": 3}
    ]))
    .unwrap()));
    let log = NotificationLog::new();
    let page = JobListPage::home(&deps(&backend, &log, &AppContext::new()));

    assert!(page.view().is_loading());
    let region = page.settled_view().await;
    assert_eq!(region.items().len(), 1);
    assert_eq!(region.items()[0].key, "1");
    assert!(log.is_empty());
}

#[tokio::test]
async fn landing_page_failure_notifies() {
    let backend = Arc::new(FakeBackend::default());
    *backend.jobs.lock().unwrap() = Some(Err(FetchError::no_response("refused")));
    let log = NotificationLog::new();
    let page = JobListPage::landing(&deps(&backend, &log, &AppContext::new()));

    let region = page.settled_view().await;
    assert!(region.items().is_empty());
    let errors = log.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("An error occurred, could not get jobs"));
}

#[tokio::test]
async fn dashboard_caches_summary_in_context() {
    let backend = Arc::new(FakeBackend::default());
    *backend.dashboard.lock().unwrap() = Some(Ok(serde_json::from_value(json!({
        "total_jobs_posted": [1, 2],
        "active_jobs": [1],
        "expired_jobs": [2]
    }))
    .unwrap()));
    let log = NotificationLog::new();
    let ctx = AppContext::with_session(Some(employer()));
    let deps = deps(&backend, &log, &ctx);

    let dashboard = EmployerDashboard::mount(&deps);
    let DashboardView::Ready(counts) = dashboard.settled_view().await else {
        panic!("dashboard still loading");
    };
    assert_eq!(counts.total_jobs_posted, "2");
    assert!(ctx.notifications().is_some());
    assert_eq!(backend.auth.lock().unwrap().as_deref(), Some("Token emp"));

    let again = EmployerDashboard::mount(&deps);
    assert!(matches!(again.view(), DashboardView::Ready(_)));
    assert_eq!(backend.dashboard_calls.load(Ordering::SeqCst), 1);

    again.refresh();
    again.settled_view().await;
    assert_eq!(backend.dashboard_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn post_job_validates_before_sending() {
    let backend = Arc::new(FakeBackend::default());
    *backend.dashboard.lock().unwrap() = Some(Ok(DashboardSummary::default()));
    let log = NotificationLog::new();
    let ctx = AppContext::with_session(Some(employer()));
    let dashboard = EmployerDashboard::mount(&deps(&backend, &log, &ctx));
    dashboard.settled_view().await;

    let err = dashboard.post_job(&JobPosting::default()).await.unwrap_err();
    assert!(matches!(err, DevJobsError::Validation(_)));
    assert!(log.is_empty());

    *backend.create_job.lock().unwrap() = Some(Ok(json!({"id": 9})));
    dashboard.post_job(&posting()).await.unwrap();
    assert_eq!(log.last().map(|n| n.message), Some(JOB_POSTED.to_string()));

    *backend.create_job.lock().unwrap() = Some(Err(FetchError::no_response("reset")));
    assert!(dashboard.post_job(&posting()).await.is_err());
    assert_eq!(log.errors(), vec![SUBMIT_FAILED.to_string()]);
}

#[tokio::test]
async fn signup_success_stores_session() {
    let backend = Arc::new(FakeBackend::default());
    *backend.registration.lock().unwrap() = Some(Ok(AuthToken {
        key: "new".into(),
    }));
    let log = NotificationLog::new();
    let ctx = AppContext::new();
    let mut page = SignupPage::new(&deps(&backend, &log, &ctx), AccountKind::JobSeeker);

    let form = SignupForm {
        username: "ada".into(),
        email: "ada@example.com".into(),
        password1: "correct horse".into(),
        password2: "correct horse".into(),
    };
    let session = page.submit(&form).await.unwrap();

    assert_eq!(session.token, "new");
    assert_eq!(page.stage(), SignupStage::Completed);
    assert_eq!(ctx.session(), Some(session));
    let messages: Vec<String> = log.entries().into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        vec![REGISTRATION_SUCCESSFUL.to_string(), CONFIRMATION_SENT.to_string()]
    );
}

#[tokio::test]
async fn signup_rejection_shows_first_field_error() {
    let backend = Arc::new(FakeBackend::default());
    *backend.registration.lock().unwrap() = Some(Err(FetchError::response(
        400,
        Some(json!({
            "password1": ["This password is too common."],
            "username": ["A user with that username already exists."]
        })),
    )));
    let log = NotificationLog::new();
    let mut page = SignupPage::new(&deps(&backend, &log, &AppContext::new()), AccountKind::Employer);

    let form = SignupForm {
        username: "ada".into(),
        email: "ada@example.com".into(),
        password1: "password".into(),
        password2: "password".into(),
    };
    assert!(page.submit(&form).await.is_err());
    assert_eq!(page.stage(), SignupStage::Form);
    assert_eq!(
        log.errors(),
        vec!["A user with that username already exists.".to_string()]
    );
}

#[tokio::test]
async fn login_and_logout() {
    let backend = Arc::new(FakeBackend::default());
    let log = NotificationLog::new();
    let ctx = AppContext::new();
    let deps = deps(&backend, &log, &ctx);

    let bad = LoginForm {
        username: "ada".into(),
        password: "wrong".into(),
    };
    assert!(log_in(&deps, &bad, AccountKind::JobSeeker).await.is_err());
    assert_eq!(
        log.errors(),
        vec!["Unable to log in with provided credentials.".to_string()]
    );

    let good = LoginForm {
        username: "ada".into(),
        password: "correct horse".into(),
    };
    let session = log_in(&deps, &good, AccountKind::JobSeeker).await.unwrap();
    assert_eq!(session.username.as_deref(), Some("ada"));
    assert_eq!(
        backend.auth.lock().unwrap().as_deref(),
        Some("Token login-token")
    );

    log_out(&deps);
    assert!(!ctx.is_authenticated());
    assert_eq!(*backend.auth.lock().unwrap(), None);
    assert_eq!(log.last().map(|n| n.level), Some(Level::Info));
}

#[tokio::test]
async fn profile_page_loads_basic_profile_once() {
    let backend = Arc::new(FakeBackend::default());
    let log = NotificationLog::new();
    let ctx = AppContext::new();
    let page = ProfilePage::new(&deps(&backend, &log, &ctx));

    let view = page.load().await;
    assert_eq!(view.username, "ada");
    assert_eq!(view.first_name, "Ada");
    assert_eq!(view.last_name, "N/A");
    assert_eq!(view.about, "N/A");
    assert!(ctx.basic_profile().is_some());
    assert!(view.to_string().contains("User Name : ada"));
}

#[tokio::test]
async fn registration_submits_from_resume_step() {
    let backend = Arc::new(FakeBackend::default());
    *backend.profile_update.lock().unwrap() = Some(Ok(UserProfile {
        first_name: Some("Ada".into()),
        ..Default::default()
    }));
    let log = NotificationLog::new();
    let ctx = AppContext::with_session(Some(Session::new(
        AuthToken {
            key: "seeker".into(),
        },
        AccountKind::JobSeeker,
    )));
    let mut wizard = JobSeekerRegistration::new(&deps(&backend, &log, &ctx));

    assert!(matches!(
        wizard.submit().await,
        Err(DevJobsError::Transition(_))
    ));

    {
        let draft = &mut wizard.machine_mut().draft;
        draft.first_name = "Ada".into();
        draft.email = "ada@example.com".into();
        draft.country = "UK".into();
        draft.state = "London".into();
        draft.city = "London".into();
        draft.about = "Engineer".into();
        draft.experience_level = "Senior".into();
    }
    for _ in 0..4 {
        wizard.next().unwrap();
    }
    assert_eq!(wizard.step(), Step::ResumeUpload);

    wizard.submit().await.unwrap();
    assert_eq!(wizard.step(), Step::Complete);
    assert!(!wizard.machine().is_loading());
    assert_eq!(
        ctx.full_profile().and_then(|p| p.first_name),
        Some("Ada".into())
    );
}
