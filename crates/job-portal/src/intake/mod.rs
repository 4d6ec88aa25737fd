//! Job application intake: the two form shapes, their validation, and the submission
//! boundary that forwards a validated application to the configured webhook.

pub mod client;
pub mod countries;
pub mod domain;
pub mod interpret;
pub mod resume;
pub mod service;
pub mod transport;
pub mod validation;

#[cfg(test)]
mod tests;

pub use client::{HttpTransport, TransportError, TransportResponse, WebhookTransport};
pub use domain::{
    Application, CompanyApplication, EmployeeApplication, FormKind, JobType, ResumeAttachment,
    SkillLevel, MAX_SKILLS,
};
pub use interpret::{interpret, OutcomeKind, SubmissionResult};
pub use resume::{ResumePolicy, ResumeUpload, ResumeUploader, UploadRejection};
pub use service::SubmissionService;
pub use transport::{
    build_request, decode_embedded_resume, select_strategy, AuthHeader, FileEncoding,
    OutboundRequest, RequestBody, TransportStrategy, WebhookTarget,
};
pub use validation::{validate, FieldErrors};
