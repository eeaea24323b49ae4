/// An AES-256-GCM sealed secret as stored at rest.
///
/// The three parts are kept separate in the credentials table so a row can
/// be validated before any decryption is attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
}
