//! Outcome descriptors handed to the presentation layer. The backend never
//! renders templates; it fixes the data the renderer receives.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub msg: String,
}

/// Form fields echoed back after a failed registration. Never the password.
#[derive(Debug, Clone, Serialize)]
pub struct EchoedUser {
    pub nombre: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub pagina: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errores: Vec<ErrorEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<EchoedUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl PageView {
    pub fn new(pagina: &str) -> Self {
        Self {
            pagina: pagina.to_string(),
            csrf_token: None,
            errores: Vec::new(),
            usuario: None,
            mensaje: None,
            error: None,
        }
    }

    pub fn with_csrf(mut self, token: String) -> Self {
        self.csrf_token = Some(token);
        self
    }

    pub fn with_message(mut self, mensaje: &str) -> Self {
        self.mensaje = Some(mensaje.to_string());
        self
    }

    pub fn with_errors(mut self, messages: Vec<String>) -> Self {
        self.errores = messages.into_iter().map(|msg| ErrorEntry { msg }).collect();
        self.error = Some(true);
        self
    }

    pub fn with_user(mut self, nombre: String, email: String) -> Self {
        self.usuario = Some(EchoedUser { nombre, email });
        self
    }
}
