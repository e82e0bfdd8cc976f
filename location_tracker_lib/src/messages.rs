//! User-facing texts shared by the server responses and the client display.

pub const SAVE_OK: &str = "Localização salva com sucesso!";
pub const SAVE_FAILED: &str = "Erro ao salvar a localização.";
pub const LIST_FAILED: &str = "Erro ao buscar localizações.";
pub const CLEAR_OK: &str = "Localizações limpas com sucesso!";
pub const CLEAR_FAILED: &str = "Erro ao limpar as localizações.";
pub const UNAUTHORIZED: &str = "Acesso não autorizado.";
pub const INVALID_COORDINATES: &str = "Coordenadas inválidas.";
