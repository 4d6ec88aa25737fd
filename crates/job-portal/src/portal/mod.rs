//! Headless portal state: sign-in, the two intake forms, the thank-you page and toasts.
//!
//! Front ends drive a [`Portal`] and render whatever it reports; nothing here draws anything.

pub mod session;
pub mod theme;


use serde::Serialize;

use crate::intake::{
    validate, Application, CompanyApplication, EmployeeApplication, FieldErrors, FormKind,
    SubmissionResult, SubmissionService, WebhookTransport,
};

pub use session::{CredentialVerifier, Session, StaticCredentials};
pub use theme::{ColorScheme, InMemoryPreferenceStore, PreferenceStore, ThemePreference, ThemeSettings};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILURE_MESSAGE: &str = "Invalid email or password.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Login,
    Form,
    ThankYou,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Why a submission attempt did not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRefused {
    #[error("sign in before submitting")]
    NotSignedIn,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the form has {0} invalid field(s)")]
    Invalid(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Refused(SubmitRefused),
    Delivered(SubmissionResult),
    Failed(SubmissionResult),
}

/// A validated application that has been handed out for sending.
///
/// Obtained from [`Portal::begin_submission`]; the result goes back through
/// [`Portal::finish_submission`].
#[derive(Debug)]
pub struct PendingSubmission {
    application: Application,
    session_generation: u64,
}

impl PendingSubmission {
    pub fn application(&self) -> &Application {
        &self.application
    }
}

pub struct Portal<V> {
    verifier: V,
    page: Page,
    active_form: FormKind,
    company: CompanyApplication,
    employee: EmployeeApplication,
    errors: FieldErrors,
    toast: Option<Toast>,
    session: Option<Session>,
    // Bumped on every sign-in and sign-out.
    session_generation: u64,
    submitting: bool,
}

impl<V> Portal<V>
where
    V: CredentialVerifier,
{
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            page: Page::Login,
            active_form: FormKind::Company,
            company: CompanyApplication::default(),
            employee: EmployeeApplication::default(),
            errors: FieldErrors::default(),
            toast: None,
            session: None,
            session_generation: 0,
            submitting: false,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn dismiss_toast(&mut self) -> Option<Toast> {
        self.toast.take()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn active_form(&self) -> FormKind {
        self.active_form
    }

    pub fn select_form(&mut self, kind: FormKind) {
        self.active_form = kind;
    }

    pub fn company(&self) -> &CompanyApplication {
        &self.company
    }

    pub fn company_mut(&mut self) -> &mut CompanyApplication {
        &mut self.company
    }

    pub fn employee(&self) -> &EmployeeApplication {
        &self.employee
    }

    pub fn employee_mut(&mut self) -> &mut EmployeeApplication {
        &mut self.employee
    }

    /// Returns the error text to show under the login form on failure.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<(), &'static str> {
        if !self.verifier.verify(email, password) {
            tracing::info!("sign-in rejected");
            return Err(LOGIN_FAILURE_MESSAGE);
        }

        self.session = Some(Session::start(email));
        self.session_generation += 1;
        self.page = Page::Form;
        self.toast = Some(Toast::success(LOGIN_SUCCESS_MESSAGE));
        tracing::info!("sign-in accepted");
        Ok(())
    }

    /// Ends the session and clears the drafts. A submission already in flight keeps the
    /// in-flight flag set until it is finished.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.session_generation += 1;
        self.page = Page::Login;
        self.active_form = FormKind::Company;
        self.company = CompanyApplication::default();
        self.employee = EmployeeApplication::default();
        self.errors = FieldErrors::default();
    }

    /// Validate the active form and, if it is clean, mark a submission as in flight.
    ///
    /// Field errors are stored on the portal; nothing is handed out while any remain.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitRefused> {
        if self.session.is_none() || self.page != Page::Form {
            return Err(SubmitRefused::NotSignedIn);
        }
        if self.submitting {
            return Err(SubmitRefused::InFlight);
        }

        let application = match self.active_form {
            FormKind::Company => Application::Company(self.company.clone()),
            FormKind::Employee => Application::Employee(self.employee.clone()),
        };

        self.errors = validate(&application);
        if !self.errors.is_empty() {
            tracing::debug!(
                kind = %self.active_form,
                invalid = self.errors.len(),
                "form has validation errors"
            );
            return Err(SubmitRefused::Invalid(self.errors.len()));
        }

        self.submitting = true;
        Ok(PendingSubmission {
            application,
            session_generation: self.session_generation,
        })
    }

    /// Apply the result of a submission started with [`Portal::begin_submission`].
    pub fn finish_submission(
        &mut self,
        pending: PendingSubmission,
        result: SubmissionResult,
    ) -> SubmitOutcome {
        self.submitting = false;

        // Started under a session that has since ended.
        if pending.session_generation != self.session_generation {
            tracing::info!(
                success = result.success,
                "submission settled after its session ended"
            );
            return if result.success {
                SubmitOutcome::Delivered(result)
            } else {
                SubmitOutcome::Failed(result)
            };
        }

        if !result.success {
            self.toast = Some(Toast::error(result.message.clone()));
            return SubmitOutcome::Failed(result);
        }

        match pending.application.kind() {
            FormKind::Company => self.company = CompanyApplication::default(),
            FormKind::Employee => self.employee = EmployeeApplication::default(),
        }
        self.page = Page::ThankYou;
        SubmitOutcome::Delivered(result)
    }

    /// Validate, send once and apply the result.
    pub async fn submit<T>(&mut self, service: &SubmissionService<T>) -> SubmitOutcome
    where
        T: WebhookTransport,
    {
        let pending = match self.begin_submission() {
            Ok(pending) => pending,
            Err(refused) => return SubmitOutcome::Refused(refused),
        };

        let result = service.submit(pending.application()).await;
        self.finish_submission(pending, result)
    }

    pub fn start_over(&mut self) {
        if self.page == Page::ThankYou {
            self.page = Page::Form;
        }
    }
}
