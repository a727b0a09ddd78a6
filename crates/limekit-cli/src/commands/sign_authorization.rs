//! `limekit sign-authorization`: Sign the wrap authorization message.
//!
//! The output is pasted into the `authorization` section of the config of
//! the wallet that will call `wrapWithSignature`.

use std::path::PathBuf;

use limekit_core::authorization::SignedAuthorization;
use limekit_signer::signer::recover_signer;

use super::{load_config, resolve_config_path, unlock_signer, CliResult};

pub fn run(message: String, config_path: Option<PathBuf>) -> CliResult {
    let config = load_config(&resolve_config_path(config_path)?)?;
    let signer = unlock_signer(&config)?;
    let auth = signer.sign_authorization(&message)?;

    let recovered = recover_signer(auth.message_hash.as_slice(), &auth.signature)?;
    if recovered != auth.signer {
        return Err(format!("signature recovers to {recovered}, expected {}", auth.signer).into());
    }

    print!("{}", render(&message, &auth));
    Ok(())
}

fn render(message: &str, auth: &SignedAuthorization) -> String {
    format!(
        "message hash: {hash}\n\
         v: {v}\n\
         r: {r}\n\
         s: {s}\n\
         \n\
         authorization:\n  \
         message: {message:?}\n  \
         signature: \"{sig}\"\n  \
         signer: \"{signer}\"\n",
        hash = auth.message_hash,
        v = auth.signature.v,
        r = auth.signature.r,
        s = auth.signature.s,
        sig = auth.signature.to_hex(),
        signer = auth.signer,
    )
}
