// src/models/session.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// --- IDENTIDADE ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Administrador,
    Operador,
    Visitante,
}

/// Nome que recebe o papel de administrador no login de turno.
pub const ADMIN_NAME: &str = "Administrador";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = "Carlos Souza")]
    pub name: String,
    pub role: Role,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Visitante".to_string(),
            role: Role::Visitante,
        }
    }
}

impl UserProfile {
    pub fn for_shift(employee_name: &str) -> Self {
        let role = if employee_name == ADMIN_NAME {
            Role::Administrador
        } else {
            Role::Operador
        };
        Self {
            name: employee_name.to_string(),
            role,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 2, message = "invalid_name"))]
    #[schema(example = "Carlos Souza")]
    pub employee_name: String,
}

// --- NAVEGAÇÃO ---

/// Páginas navegáveis. Os ids são os mesmos do menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Dashboard,
    Ocorrencias,
    Ponto,
    Moradores,
    Funcionarios,
    Empresas,
    Entregadores,
    Encomendas,
    Recebidos,
    Materiais,
    Visitantes,
    Visitas,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[schema(no_recursion)]
    pub children: Vec<MenuItem>,
}

fn item(id: &str, label: &str, icon: &str) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
        children: Vec::new(),
    }
}

fn group(id: &str, label: &str, icon: &str, children: Vec<MenuItem>) -> MenuItem {
    MenuItem { children, ..item(id, label, icon) }
}

/// Menu lateral: operacional e cadastro são grupos com submenus.
pub fn menu() -> Vec<MenuItem> {
    vec![
        item("dashboard", "Dashboard", "layout-dashboard"),
        group(
            "operacional",
            "Operacional",
            "clipboard-list",
            vec![
                item("ocorrencias", "Ocorrências", "alert-circle"),
                item("ponto", "Folha de Ponto", "calendar-clock"),
            ],
        ),
        group(
            "cadastro",
            "Cadastro",
            "folder-kanban",
            vec![
                item("moradores", "Moradores", "user-square-2"),
                item("funcionarios", "Funcionários", "briefcase"),
                item("empresas", "Empresas", "building-2"),
                item("entregadores", "Entregadores", "truck"),
            ],
        ),
        item("encomendas", "Encomendas", "package"),
        item("recebidos", "Itens Recebidos", "inbox"),
        item("materiais", "Materiais", "box"),
        item("visitantes", "Visitantes", "users"),
        item("visitas", "Visitas Entregadores", "map-pin"),
    ]
}

// --- ESTADO DA CASCA ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotepadState {
    pub is_open: bool,
    pub is_minimized: bool,
}

/// Fotografia do estado da casca devolvida ao front end.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShellView {
    pub user: UserProfile,
    pub is_authenticated: bool,
    pub is_logout_pending: bool,
    pub active_page: Page,
    pub is_sidebar_open: bool,
    pub notepad: NotepadState,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigatePayload {
    pub page: Page,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SidebarPayload {
    pub open: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotepadAction {
    Open,
    Close,
    Minimize,
    Maximize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_admin_name_gets_the_admin_role() {
        assert_eq!(UserProfile::for_shift("Administrador").role, Role::Administrador);
        assert_eq!(UserProfile::for_shift("administrador").role, Role::Operador);
        assert_eq!(UserProfile::default().role, Role::Visitante);
    }

    #[test]
    fn identity_is_stored_with_uppercase_roles() {
        let json = serde_json::to_string(&UserProfile::for_shift("Carlos")).unwrap();
        assert_eq!(json, r#"{"name":"Carlos","role":"OPERADOR"}"#);
    }

    #[test]
    fn every_page_appears_in_the_menu() {
        let menu = menu();
        let ids: Vec<&str> = menu
            .iter()
            .flat_map(|m| std::iter::once(m).chain(m.children.iter()))
            .map(|m| m.id.as_str())
            .collect();
        for page in [Page::Dashboard, Page::Ponto, Page::Entregadores, Page::Visitas] {
            let id = serde_json::to_value(page).unwrap();
            assert!(ids.contains(&id.as_str().unwrap()));
        }
    }
}
