// src/services/session_service.rs

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    common::error::AppError,
    db::KeyValueStore,
    models::{
        occurrence::NewOccurrence,
        session::{NotepadAction, NotepadState, Page, ShellView, UserProfile},
    },
    services::{refresh_service::RefreshCoordinator, staff_service::StaffService},
};

/// Chave da identidade no armazenamento local.
pub const IDENTITY_KEY: &str = "portaria_user";

#[derive(Debug, Default)]
struct ShellState {
    user: Option<UserProfile>,
    logout_pending: bool,
    active_page: Page,
    sidebar_open: bool,
    notepad: NotepadState,
}

/// Casca da aplicação: login de turno, navegação, menu lateral e bloco de notas.
#[derive(Clone)]
pub struct SessionService {
    coordinator: Arc<RefreshCoordinator>,
    store: Arc<dyn KeyValueStore>,
    staff: StaffService,
    state: Arc<Mutex<ShellState>>,
}

impl SessionService {
    /// Já sai restaurado a partir do armazenamento local.
    pub fn new(coordinator: Arc<RefreshCoordinator>, store: Arc<dyn KeyValueStore>, staff: StaffService) -> Self {
        let service = Self {
            coordinator,
            store,
            staff,
            state: Arc::new(Mutex::new(ShellState::default())),
        };
        service.restore();
        service
    }

    /// Lê a identidade salva. Valor ilegível ou ausente = deslogado.
    fn restore(&self) {
        let user = match self.store.get(IDENTITY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Identidade salva ilegível, ignorando: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Falha ao ler o armazenamento local: {}", e);
                None
            }
        };

        if let Some(user) = &user {
            tracing::info!("🔑 Sessão restaurada: {} ({:?})", user.name, user.role);
        }
        self.lock().user = user;
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    /// Login de turno só pelo nome; nada é conferido no servidor.
    pub fn login(&self, employee_name: &str) -> Result<ShellView, AppError> {
        let user = UserProfile::for_shift(employee_name);
        let raw = serde_json::to_string(&user).map_err(anyhow::Error::from)?;
        self.store.set(IDENTITY_KEY, &raw)?;

        tracing::info!("🔑 Turno iniciado por {} ({:?})", user.name, user.role);
        {
            let mut state = self.lock();
            state.user = Some(user);
            state.logout_pending = false;
        }
        Ok(self.view())
    }

    // --- LOGOUT (em duas etapas) ---

    pub fn request_logout(&self) -> ShellView {
        self.lock().logout_pending = true;
        self.view()
    }

    pub fn cancel_logout(&self) -> ShellView {
        self.lock().logout_pending = false;
        self.view()
    }

    /// Sem pedido aberto, não faz nada.
    pub fn confirm_logout(&self) -> Result<ShellView, AppError> {
        {
            let mut state = self.lock();
            if !state.logout_pending {
                drop(state);
                return Ok(self.view());
            }
            // Só limpa a memória depois do armazenamento.
            self.store.remove(IDENTITY_KEY)?;
            state.logout_pending = false;
            state.user = None;
            state.sidebar_open = false;
            state.active_page = Page::Dashboard;
        }
        tracing::info!("🔒 Turno encerrado");
        Ok(self.view())
    }

    // --- NAVEGAÇÃO ---

    pub fn navigate(&self, page: Page) -> ShellView {
        self.lock().active_page = page;
        self.view()
    }

    pub fn set_sidebar(&self, open: bool) -> ShellView {
        self.lock().sidebar_open = open;
        self.view()
    }

    pub fn notepad(&self, action: NotepadAction) -> ShellView {
        {
            let mut state = self.lock();
            let notepad = &mut state.notepad;
            match action {
                NotepadAction::Open => {
                    notepad.is_open = true;
                    notepad.is_minimized = false;
                }
                NotepadAction::Close => notepad.is_open = false,
                NotepadAction::Minimize => notepad.is_minimized = true,
                NotepadAction::Maximize => notepad.is_minimized = false,
            }
        }
        self.view()
    }

    /// Salvar o bloco de notas registra uma ocorrência e leva à tela de ocorrências.
    pub async fn save_notepad(&self, payload: NewOccurrence) -> Result<ShellView, AppError> {
        self.staff.create_occurrence(payload).await?;
        Ok(self.navigate(Page::Ocorrencias))
    }

    pub fn view(&self) -> ShellView {
        let state = self.lock();
        ShellView {
            user: state.user.clone().unwrap_or_default(),
            is_authenticated: state.user.is_some(),
            is_logout_pending: state.logout_pending,
            active_page: state.active_page,
            is_sidebar_open: state.sidebar_open,
            notepad: state.notepad,
            is_loading: self.coordinator.is_loading(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ShellState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
