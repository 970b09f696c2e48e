// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Sessão ---
        handlers::session::get_shell,
        handlers::session::get_menu,
        handlers::session::login_names,
        handlers::session::login,
        handlers::session::request_logout,
        handlers::session::cancel_logout,
        handlers::session::confirm_logout,
        handlers::session::navigate,
        handlers::session::set_sidebar,
        handlers::session::notepad_action,
        handlers::session::save_notepad,

        // --- Sincronização ---
        handlers::sync::get_status,
        handlers::sync::refresh,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Cadastro ---
        handlers::registry::list_residents,
        handlers::registry::create_resident,
        handlers::registry::list_companies,
        handlers::registry::create_company,
        handlers::staff::list_employees,
        handlers::staff::create_employee,
        handlers::staff::update_employee,
        handlers::staff::list_occurrences,
        handlers::staff::create_occurrence,

        // --- Encomendas ---
        handlers::packages::list_packages,
        handlers::packages::get_stats,
        handlers::packages::pending_groups,
        handlers::packages::create_package,
        handlers::packages::pickup_package,
        handlers::packages::bulk_pickup,

        // --- Itens recebidos ---
        handlers::received_items::list_items,
        handlers::received_items::get_stats,
        handlers::received_items::create_item,
        handlers::received_items::pickup_item,

        // --- Materiais ---
        handlers::materials::list_loans,
        handlers::materials::lend_material,
        handlers::materials::return_material,

        // --- Visitantes ---
        handlers::visitors::list_visitors,
        handlers::visitors::visitor_history,
        handlers::visitors::register_entry,
        handlers::visitors::register_exit,

        // --- Folha de ponto ---
        handlers::time_records::list_records,
        handlers::time_records::create_record,
        handlers::time_records::update_record,
        handlers::time_records::clear_state,
        handlers::time_records::request_clear,
        handlers::time_records::cancel_clear,
        handlers::time_records::confirm_clear,
        handlers::time_records::export_csv,
        handlers::time_records::print_pdf,

        // --- Entregadores ---
        handlers::delivery::list_drivers,
        handlers::delivery::create_driver,
        handlers::delivery::update_driver,
        handlers::delivery::list_visits,
        handlers::delivery::day_summary,
        handlers::delivery::create_visit,
        handlers::delivery::update_visit,

        // --- Exclusão ---
        handlers::deletes::get_pending,
        handlers::deletes::request_delete,
        handlers::deletes::cancel_delete,
        handlers::deletes::confirm_delete,
    ),
    components(
        schemas(
            // --- Sessão ---
            models::session::Role,
            models::session::UserProfile,
            models::session::LoginPayload,
            models::session::Page,
            models::session::MenuItem,
            models::session::NotepadState,
            models::session::ShellView,
            models::session::NavigatePayload,
            models::session::SidebarPayload,
            models::session::NotepadAction,

            // --- Sincronização ---
            models::collection::Collection,
            models::collection::Scope,
            models::collection::AllScope,
            services::refresh_service::SyncStatus,
            services::refresh_service::CollectionStatus,
            handlers::sync::RefreshRequest,
            handlers::sync::RefreshReport,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Cadastro ---
            models::resident::Resident,
            models::resident::NewResident,
            models::company::Company,
            models::company::NewCompany,
            models::employee::EmployeeStatus,
            models::employee::Employee,
            models::employee::EmployeeForm,
            models::occurrence::Occurrence,
            models::occurrence::NewOccurrence,

            // --- Encomendas e itens recebidos ---
            models::package::PickupStatus,
            models::package::Package,
            models::package::NewPackage,
            models::package::PickupPayload,
            models::package::BulkPickupPayload,
            models::package::PickupStats,
            models::package::UnitGroup,
            models::package::BlockGroup,
            models::received_item::OperationType,
            models::received_item::ReceivedItem,
            models::received_item::NewReceivedItem,

            // --- Materiais e visitantes ---
            models::material::LoanStatus,
            models::material::BorrowedMaterial,
            models::material::NewLoan,
            models::visitor::VisitorStatus,
            models::visitor::Visitor,
            models::visitor::NewVisitor,

            // --- Folha de ponto ---
            models::time_record::Shift,
            models::time_record::TimeRecord,
            models::time_record::TimeRecordForm,

            // --- Entregadores ---
            models::delivery::DriverStatus,
            models::delivery::DeliveryDriver,
            models::delivery::DriverForm,
            models::delivery::DeliveryVisit,
            models::delivery::VisitForm,
            models::delivery::VisitDaySummary,

            // --- Exclusão ---
            handlers::deletes::DeleteRequest,
            handlers::deletes::PendingDelete,
        )
    ),
    tags(
        (name = "Sessão", description = "Login de turno, navegação e bloco de notas"),
        (name = "Sincronização", description = "Atualização das coleções em memória"),
        (name = "Dashboard", description = "Indicadores do dia"),
        (name = "Cadastro", description = "Moradores e empresas"),
        (name = "Funcionários", description = "Equipe da portaria"),
        (name = "Ocorrências", description = "Passagem de turno"),
        (name = "Encomendas", description = "Recebimento e retirada de encomendas"),
        (name = "Itens Recebidos", description = "Itens deixados na portaria"),
        (name = "Materiais", description = "Empréstimo de materiais"),
        (name = "Visitantes", description = "Entrada e saída de visitantes"),
        (name = "Folha de Ponto", description = "Registros de ponto e exportação"),
        (name = "Entregadores", description = "Cadastro de entregadores"),
        (name = "Visitas de Entregadores", description = "Visitas e volumes por dia"),
        (name = "Exclusão", description = "Exclusão com confirmação")
    )
)]
pub struct ApiDoc;
