mod decrypt;
mod encrypt;
mod next_iv;
mod transform;

pub use self::decrypt::DecryptCommand;
pub use self::encrypt::EncryptCommand;
pub use self::next_iv::NextIvCommand;
