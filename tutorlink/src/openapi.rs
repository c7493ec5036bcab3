//! OpenAPI documentation for the management API.

use utoipa::OpenApi;

use crate::api::{handlers, models};
use crate::db::models as db_models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TutorLink API",
        description = "Tutoring marketplace backend: coin wallet, contact and application workflows, payments and learning resources."
    ),
    paths(
        handlers::users::get_me,
        handlers::users::create_user,
        handlers::teachers::create_teacher_profile,
        handlers::teachers::get_teacher,
        handlers::teachers::set_teacher_approval,
        handlers::posts::create_post,
        handlers::posts::get_post,
        handlers::wallet::get_wallet,
        handlers::wallet::get_transactions,
        handlers::contacts::initiate_contact,
        handlers::contacts::get_contact_status,
        handlers::contacts::list_teacher_contacts,
        handlers::applications::apply_to_post,
        handlers::applications::get_contact_information,
        handlers::applications::check_application_status,
        handlers::applications::list_my_applications,
        handlers::applications::set_application_status,
        handlers::payments::create_payment,
        handlers::payments::create_payment_by_coins,
        handlers::payments::capture_payment,
        handlers::payments::payment_history,
        handlers::payments::get_coin_packages,
        handlers::payments::get_coin_rate,
        handlers::payments::cancel_pending_payments,
        handlers::payments::cleanup_pending_payments,
        handlers::resources::get_resources,
        handlers::resources::get_course_resources,
        handlers::resources::upsert_resources,
        handlers::resources::add_mcq,
        handlers::resources::add_mcqs,
        handlers::resources::update_mcq,
        handlers::resources::delete_mcq,
        handlers::resources::bulk_import_mcqs,
        handlers::resources::add_revision_note,
        handlers::resources::update_revision_note,
        handlers::resources::delete_revision_note,
        handlers::resources::toggle_resource_type,
        handlers::resources::add_past_paper,
        handlers::resources::update_past_paper,
        handlers::resources::delete_past_paper,
    ),
    components(schemas(
        models::users::CurrentUser,
        models::users::UserCreate,
        models::users::UserResponse,
        models::teachers::TeacherProfileCreate,
        models::teachers::TeacherProfileResponse,
        models::posts::PostCreate,
        models::posts::PostResponse,
        models::wallet::WalletResponse,
        models::wallet::TransactionResponse,
        models::contacts::ContactInitiate,
        models::contacts::ContactResponse,
        models::contacts::ContactWithStudentResponse,
        models::applications::ApplicationResponse,
        models::applications::ApplicationListResponse,
        models::applications::ApplicationStats,
        models::applications::ApplicationStatusUpdate,
        models::applications::ContactInformationResponse,
        models::payments::PaymentCreate,
        models::payments::PaymentCreateByCoins,
        models::payments::PaymentCapture,
        models::payments::PaymentCreatedResponse,
        models::payments::PaymentCompletedResponse,
        models::payments::PaymentResponse,
        models::payments::CoinPackage,
        models::resources::McqCreate,
        models::resources::McqBatchCreate,
        models::resources::McqBatchResult,
        models::resources::BulkMcqItem,
        models::resources::BulkImportRequest,
        models::resources::BulkImportResult,
        models::resources::TopicBreakdown,
        models::resources::PdfOutcome,
        models::resources::ToggleRequest,
        models::resources::ResourceUpsert,
        models::resources::ResourceDocResponse,
        models::teachers::TeacherApproval,
        db_models::users::Role,
        db_models::wallets::EntryType,
        db_models::wallets::ReferenceKind,
        db_models::contacts::ContactStatus,
        db_models::applications::ApplicationStatus,
        db_models::payments::PaymentStatus,
        db_models::resources::ResourceDoc,
        db_models::resources::Mcq,
        db_models::resources::Difficulty,
        db_models::resources::NoteTopic,
        db_models::resources::PastPaper,
    )),
    tags(
        (name = "users", description = "Accounts"),
        (name = "teachers", description = "Tutor profiles"),
        (name = "posts", description = "Student post requirements"),
        (name = "wallet", description = "Coin wallet and ledger"),
        (name = "contacts", description = "Paid contact unlocks"),
        (name = "applications", description = "Paid tutor applications"),
        (name = "payments", description = "Coin top-ups"),
        (name = "resources", description = "Learning resource tree"),
    )
)]
pub struct ApiDoc;
