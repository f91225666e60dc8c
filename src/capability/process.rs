//! Out-of-process capability adapter.
//!
//! The vendor routines are untrusted script text. Rather than evaluating it
//! in this process, every call is delegated to an external helper program
//! (typically a script runtime started in a restricted mode). The helper is
//! invoked as `PROGRAM [ARGS...] OPERATION`, receives a JSON request on stdin
//! and must answer with `{"result": ...}` on stdout and a zero exit status.
//!
//! [`ProcessResolver::bundled`] runs the helper shipped with the crate
//! (`helper/folio-decoder.js`) under a Node runtime. It evaluates each vendor
//! slice in a fresh `vm` context.
//!
//! Request shape:
//!
//! ```json
//! {
//!   "compression_source": "KindleCompression=...",
//!   "decryption_source": "KindleO_Aaa=...",
//!   "args": { "payload": "...", "key": "..." }
//! }
//! ```

use std::{
    ffi::OsString,
    io::Write,
    path::PathBuf,
    process::{Command, Stdio},
    sync::Arc,
    thread,
};

use serde::Deserialize;
use serde_json::{Value, json};

use super::{
    Capabilities,
    CapabilityError,
    CapabilityFault,
    CapabilityKind,
    CapabilityResolver,
    CompressionDictionary,
    DecompressCapability,
    DecryptCapability,
    DecryptionKey,
    DictionaryBuilderCapability,
    VendorSource,
};
use crate::document::CompressionSeed;

/// Source of the bundled Node helper.
pub const NODE_HELPER: &str = include_str!("../../helper/folio-decoder.js");

#[derive(Deserialize)]
struct HelperResponse {
    result: Value,
}

/// Resolves capabilities by probing an external helper program.
#[derive(Clone, Debug)]
pub struct ProcessResolver {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessResolver {
    /// Create a resolver delegating to `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Create a resolver running [`NODE_HELPER`] with the Node runtime `node`.
    #[must_use]
    pub fn bundled(node: impl Into<PathBuf>) -> Self { Self::new(node).arg("-e").arg(NODE_HELPER) }

    /// Append a fixed argument passed before the operation name.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl CapabilityResolver for ProcessResolver {
    fn resolve(&self, source: &VendorSource) -> Result<Capabilities, CapabilityError> {
        let helper = Arc::new(ProcessCapabilities {
            program: self.program.clone(),
            args: self.args.clone(),
            source: source.clone(),
        });
        for capability in [CapabilityKind::Compression, CapabilityKind::Decryption] {
            helper
                .call("probe", &json!({ "capability": capability.to_string() }))
                .map_err(|fault| CapabilityError::Unavailable {
                    capability,
                    reason: fault.message().to_owned(),
                })?;
        }
        Ok(Capabilities::from_shared(helper))
    }
}

/// Capabilities backed by the helper program.
#[derive(Debug)]
pub struct ProcessCapabilities {
    program: PathBuf,
    args: Vec<OsString>,
    source: VendorSource,
}

impl ProcessCapabilities {
    fn call(&self, operation: &str, args: &Value) -> Result<Value, CapabilityFault> {
        let request = json!({
            "compression_source": self.source.compression,
            "decryption_source": self.source.decryption,
            "args": args,
        });
        let body = serde_json::to_vec(&request)
            .map_err(|err| CapabilityFault::new(format!("cannot encode request: {err}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(operation)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                CapabilityFault::new(format!("cannot start {}: {err}", self.program.display()))
            })?;

        // stdin is written concurrently with draining stdout.
        let writer = child
            .stdin
            .take()
            .map(|mut stdin| thread::spawn(move || stdin.write_all(&body)));
        let output = child
            .wait_with_output()
            .map_err(|err| CapabilityFault::new(format!("helper did not finish: {err}")))?;
        if let Some(handle) = writer {
            handle
                .join()
                .map_err(|_| CapabilityFault::new(format!("{operation} request writer panicked")))?
                .map_err(|err| {
                    CapabilityFault::new(format!("cannot send {operation} request: {err}"))
                })?;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CapabilityFault::new(format!(
                "{operation} failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        let response: HelperResponse = serde_json::from_slice(&output.stdout)
            .map_err(|err| CapabilityFault::new(format!("malformed {operation} response: {err}")))?;
        Ok(response.result)
    }

    fn call_text(&self, operation: &str, args: &Value) -> Result<String, CapabilityFault> {
        match self.call(operation, args)? {
            Value::String(text) => Ok(text),
            other => Err(CapabilityFault::new(format!(
                "{operation} returned non-text result: {other}"
            ))),
        }
    }
}

impl DecryptCapability for ProcessCapabilities {
    fn decrypt(&self, payload: &str, key: &DecryptionKey) -> Result<String, CapabilityFault> {
        self.call_text("decrypt", &json!({ "payload": payload, "key": key.as_str() }))
    }
}

impl DecompressCapability for ProcessCapabilities {
    fn decompress(
        &self,
        payload: &str,
        dictionary: &CompressionDictionary,
    ) -> Result<String, CapabilityFault> {
        self.call_text(
            "decompress",
            &json!({ "payload": payload, "dictionary": dictionary.as_value() }),
        )
    }
}

impl DictionaryBuilderCapability for ProcessCapabilities {
    fn build_dictionary(
        &self,
        seed: &CompressionSeed,
    ) -> Result<CompressionDictionary, CapabilityFault> {
        let args = json!({
            "kind": seed.kind(),
            "offset": seed.offset(),
            "seed": seed.value(),
        });
        self.call("dictionary", &args).map(CompressionDictionary::new)
    }
}
