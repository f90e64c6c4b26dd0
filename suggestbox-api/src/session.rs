use crate::STUB_UUID;

use uuid::Uuid;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn stub() -> SessionToken {
        SessionToken(STUB_UUID)
    }
}
