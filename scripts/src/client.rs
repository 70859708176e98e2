//! The operation client seam, and its implementation on top of the Octez
//! client binary.
//!
//! The Octez client signs, estimates fees for and broadcasts operations; this
//! module only drives it and interprets its output.

use std::{
    cmp::Ordering,
    ffi::OsStr,
    fmt,
    io::Write,
    path::{Path, PathBuf},
    process::Stdio,
    sync::OnceLock,
};

use lazy_static::lazy_static;
use rand::distributions::{Alphanumeric, DistString};
use regex::Regex;
use tempfile::NamedTempFile;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, trace};

use crate::{
    constants::{BURN_CAP, DEPLOYER_ALIAS, KEY_PASSWORD_LENGTH},
    errors::ClientError,
    michelson::MichelsonValue,
    types::{Address, ContractOriginationResult, Deployer},
};

/// A request to originate a contract
#[derive(Debug)]
pub struct OriginationRequest<'a> {
    /// The alias to register the new contract under
    pub alias: &'a str,
    /// The file holding the Michelson source of the contract
    pub source: &'a Path,
    /// The initial storage of the contract
    pub storage: &'a MichelsonValue,
    /// The identity signing the operation
    pub deployer: &'a Deployer,
    /// The counter the operation is issued with
    pub counter: u64,
    /// The node to broadcast to
    pub endpoint: &'a str,
}

/// A request to call an entrypoint of an originated contract
#[derive(Debug)]
pub struct InvocationRequest<'a> {
    /// The contract to call
    pub contract: &'a Address,
    /// The entrypoint to call
    pub entrypoint: &'a str,
    /// The parameter passed to the entrypoint
    pub parameter: &'a MichelsonValue,
    /// The identity signing the operation
    pub deployer: &'a Deployer,
    /// The counter the operation is issued with
    pub counter: u64,
    /// The node to broadcast to
    pub endpoint: &'a str,
}

/// Signs and broadcasts the operations of a deployment.
///
/// Implementations attempt each call exactly once; retrying is left to
/// [`crate::retry`].
#[allow(async_fn_in_trait)]
pub trait OperationClient {
    /// Makes the secret key available for signing and returns the identity it
    /// controls
    async fn import_deployer(
        &self,
        secret_key: &str,
        endpoint: &str,
    ) -> Result<Deployer, ClientError>;

    /// Reveals the deployer's public key unless it is revealed already,
    /// returning whether a reveal operation was applied.
    ///
    /// A reveal consumes a counter, so it must be applied before the counter
    /// of the deployment is fetched.
    async fn reveal_deployer(&self, deployer: &Deployer, endpoint: &str)
        -> Result<bool, ClientError>;

    /// Fetches the current counter of `account`. The next operation of the
    /// account must use the returned value plus one.
    async fn fetch_counter(&self, account: &Address, endpoint: &str) -> Result<u64, ClientError>;

    /// Originates a contract
    async fn originate(
        &self,
        request: &OriginationRequest<'_>,
    ) -> Result<ContractOriginationResult, ClientError>;

    /// Calls an entrypoint, returning the operation hash
    async fn invoke(&self, request: &InvocationRequest<'_>) -> Result<String, ClientError>;
}

lazy_static! {
    /// The deployer's public key hash, as printed by `show address`
    static ref DEPLOYER_HASH_REGEX: Regex =
        Regex::new(r"Hash: (tz[1-4][1-9A-HJ-NP-Za-km-z]{33})").unwrap();
    /// The encrypted key URI printed by `encrypt secret key`
    static ref ENCRYPTED_KEY_REGEX: Regex =
        Regex::new(r"(encrypted:[1-9A-HJ-NP-Za-km-z]+)").unwrap();
    /// The address of a newly originated contract
    static ref ORIGINATED_CONTRACT_REGEX: Regex =
        Regex::new(r"New contract (KT1[1-9A-HJ-NP-Za-km-z]{33}) originated").unwrap();
    /// The hash of an injected operation
    static ref OPERATION_HASH_REGEX: Regex =
        Regex::new(r"Operation hash is '(o[1-9A-HJ-NP-Za-km-z]{50})'").unwrap();
    /// A reveal refused because the key is already revealed
    static ref ALREADY_REVEALED_REGEX: Regex =
        Regex::new(r"(?i)(previously[_ ]revealed|already (been )?revealed)").unwrap();
    /// Failures that resubmitting the same operation cannot fix
    static ref REJECTION_REGEX: Regex = Regex::new(
        r"(?i)(balance_too_low|balance of contract \S+ too low|script_rejected|script_failed|script failed|ill_typed|ill-typed|counter_in_the_past|already used for contract|invalid_contract_notation|erroneous command line|no contract or key named|non_existing_contract|unexpected_contract|empty_implicit_contract)"
    )
    .unwrap();
}

/// Classifies a failed client invocation from its output
pub fn classify_failure(stdout: &str, stderr: &str) -> ClientError {
    let message = format!("{}\n{}", stdout.trim(), stderr.trim())
        .trim()
        .to_string();
    if REJECTION_REGEX.is_match(&message) {
        ClientError::Rejected(message)
    } else {
        ClientError::Transient(message)
    }
}

/// Whether a failed reveal only failed because the key is revealed already
pub fn is_already_revealed(error: &ClientError) -> bool {
    match error {
        ClientError::Transient(message) | ClientError::Rejected(message) => {
            ALREADY_REVEALED_REGEX.is_match(message)
        }
        _ => false,
    }
}

/// Checks that an operation issued with `counter` is the next one the node
/// accepts, given the node's current `node_counter`
pub fn classify_counter(node_counter: u64, counter: u64) -> Result<(), ClientError> {
    let expected = node_counter + 1;
    match expected.cmp(&counter) {
        Ordering::Equal => Ok(()),
        // A previous operation has not been included yet
        Ordering::Less => Err(ClientError::Transient(format!(
            "node expects counter {expected}, waiting to issue {counter}"
        ))),
        Ordering::Greater => Err(ClientError::CounterMismatch {
            expected: counter,
            found: expected,
        }),
    }
}

/// Extracts the first capture of `regex` from the client's output
fn capture(regex: &Regex, output: &str, what: &str) -> Result<String, ClientError> {
    regex
        .captures(output)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ClientError::MalformedOutput(format!("no {what} in output: {output}")))
}

/// Parses the counter returned by the node's counter RPC, a JSON string
/// holding a decimal number
pub fn parse_counter(output: &str) -> Result<u64, ClientError> {
    let value: serde_json::Value = serde_json::from_str(output.trim())
        .map_err(|e| ClientError::MalformedOutput(format!("counter {output}: {e}")))?;
    let counter = match &value {
        serde_json::Value::String(s) => s.parse::<u64>().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    };
    counter.ok_or_else(|| ClientError::MalformedOutput(format!("counter {output}")))
}

/// Parses the output of an origination
pub fn parse_origination(output: &str) -> Result<ContractOriginationResult, ClientError> {
    let contract_address = capture(&ORIGINATED_CONTRACT_REGEX, output, "contract address")?
        .parse()
        .map_err(|e| ClientError::MalformedOutput(format!("{e}")))?;
    let operation_hash = capture(&OPERATION_HASH_REGEX, output, "operation hash")?;

    Ok(ContractOriginationResult {
        operation_hash,
        contract_address,
    })
}

/// The password the deployer's key is encrypted with in the client's wallet.
///
/// The secret key itself never appears on a command line: it is encrypted
/// over stdin, and the client reads the password from a file only the
/// current user can read.
struct KeyPassword {
    /// The password
    password: String,
    /// The file holding the password, removed on drop
    file: NamedTempFile,
}

impl fmt::Debug for KeyPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPassword")
            .field("file", &self.file.path())
            .finish_non_exhaustive()
    }
}

impl KeyPassword {
    /// Generates a random password and writes it to a private file
    fn generate() -> Result<Self, ClientError> {
        let password = Alphanumeric.sample_string(&mut rand::thread_rng(), KEY_PASSWORD_LENGTH);
        let mut file = NamedTempFile::new()
            .map_err(|e| ClientError::Spawn(format!("creating password file: {e}")))?;
        file.write_all(password.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| ClientError::Spawn(format!("writing password file: {e}")))?;

        Ok(KeyPassword { password, file })
    }
}

/// An operation client shelling out to `octez-client`
#[derive(Debug)]
pub struct OctezClient {
    /// The client binary
    binary: PathBuf,
    /// The client's data directory, if not the default
    base_dir: Option<PathBuf>,
    /// The password of the imported deployer key, once imported
    key_password: OnceLock<KeyPassword>,
}

impl OctezClient {
    /// Creates a client running the given binary
    pub fn new(binary: PathBuf, base_dir: Option<PathBuf>) -> Self {
        OctezClient {
            binary,
            base_dir,
            key_password: OnceLock::new(),
        }
    }

    /// Runs a client command, signing with the imported deployer key
    async fn execute<I, S>(&self, endpoint: &str, args: I) -> Result<String, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let password_file = self.key_password.get().map(|key| key.file.path());
        self.run(endpoint, args, password_file, None).await
    }

    /// Runs a client command, feeding `input` to its stdin
    async fn run<I, S>(
        &self,
        endpoint: &str,
        args: I,
        password_file: Option<&Path>,
        input: Option<&str>,
    ) -> Result<String, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        if let Some(base_dir) = &self.base_dir {
            cmd.arg("--base-dir").arg(base_dir);
        }
        if let Some(password_file) = password_file {
            cmd.arg("--password-filename").arg(password_file);
        }
        cmd.arg("--endpoint")
            .arg(endpoint)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let spawn_error = |e: std::io::Error| ClientError::Spawn(format!("{}: {}", self.binary.display(), e));
        let mut child = cmd.spawn().map_err(spawn_error)?;
        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(input.as_bytes()).await.map_err(spawn_error)?;
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(classify_failure(
                &stdout,
                &String::from_utf8_lossy(&output.stderr),
            ));
        }

        trace!("{}", stdout);
        Ok(stdout)
    }

    /// Encrypts the secret key with the key password, passing both over
    /// stdin, and returns the encrypted key URI
    async fn encrypt_key(
        &self,
        secret_key: &str,
        key_password: &KeyPassword,
        endpoint: &str,
    ) -> Result<String, ClientError> {
        let secret_key = secret_key.strip_prefix("unencrypted:").unwrap_or(secret_key);
        let input = format!(
            "{secret_key}\n{password}\n{password}\n",
            password = key_password.password
        );

        let output = self
            .run(endpoint, ["encrypt", "secret", "key"], None, Some(&input))
            .await?;
        capture(&ENCRYPTED_KEY_REGEX, &output, "encrypted key")
    }

    /// Checks that the node will accept an operation with `counter` next
    async fn ensure_counter(
        &self,
        deployer: &Deployer,
        counter: u64,
        endpoint: &str,
    ) -> Result<(), ClientError> {
        let node_counter = self.fetch_counter(&deployer.address, endpoint).await?;
        classify_counter(node_counter, counter)
    }
}

impl OperationClient for OctezClient {
    async fn import_deployer(
        &self,
        secret_key: &str,
        endpoint: &str,
    ) -> Result<Deployer, ClientError> {
        let key_password = match self.key_password.get() {
            Some(key_password) => key_password,
            None => {
                // Set at most once, a concurrent import keeps the first password
                let _ = self.key_password.set(KeyPassword::generate()?);
                self.key_password.get().ok_or_else(|| {
                    ClientError::Spawn("key password was not stored".to_string())
                })?
            }
        };

        let key_uri = self.encrypt_key(secret_key, key_password, endpoint).await?;
        self.execute(
            endpoint,
            ["import", "secret", "key", DEPLOYER_ALIAS, key_uri.as_str(), "--force"],
        )
        .await?;

        let output = self
            .execute(endpoint, ["show", "address", DEPLOYER_ALIAS])
            .await?;
        let address = capture(&DEPLOYER_HASH_REGEX, &output, "public key hash")?
            .parse()
            .map_err(|e| ClientError::MalformedOutput(format!("{e}")))?;

        Ok(Deployer {
            alias: DEPLOYER_ALIAS.to_string(),
            address,
        })
    }

    async fn reveal_deployer(
        &self,
        deployer: &Deployer,
        endpoint: &str,
    ) -> Result<bool, ClientError> {
        match self
            .execute(endpoint, ["reveal", "key", "for", deployer.alias.as_str()])
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_already_revealed(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn fetch_counter(&self, account: &Address, endpoint: &str) -> Result<u64, ClientError> {
        let path = format!("/chains/main/blocks/head/context/contracts/{account}/counter");
        let output = self.execute(endpoint, ["rpc", "get", path.as_str()]).await?;
        parse_counter(&output)
    }

    async fn originate(
        &self,
        request: &OriginationRequest<'_>,
    ) -> Result<ContractOriginationResult, ClientError> {
        debug!("Using storage: {}", request.storage);
        debug!("Using counter: {}", request.counter);
        self.ensure_counter(request.deployer, request.counter, request.endpoint)
            .await?;

        let storage = request.storage.to_string();
        let args: [&OsStr; 14] = [
            "originate".as_ref(),
            "contract".as_ref(),
            request.alias.as_ref(),
            "transferring".as_ref(),
            "0".as_ref(),
            "from".as_ref(),
            request.deployer.alias.as_ref(),
            "running".as_ref(),
            request.source.as_os_str(),
            "--init".as_ref(),
            storage.as_ref(),
            "--burn-cap".as_ref(),
            BURN_CAP.as_ref(),
            "--force".as_ref(),
        ];
        let output = self.execute(request.endpoint, args).await?;

        parse_origination(&output)
    }

    async fn invoke(&self, request: &InvocationRequest<'_>) -> Result<String, ClientError> {
        debug!("Using parameter: {}", request.parameter);
        debug!("Using counter: {}", request.counter);
        self.ensure_counter(request.deployer, request.counter, request.endpoint)
            .await?;

        let contract = request.contract.to_string();
        let parameter = request.parameter.to_string();
        let output = self
            .execute(
                request.endpoint,
                [
                    "transfer",
                    "0",
                    "from",
                    request.deployer.alias.as_str(),
                    "to",
                    contract.as_str(),
                    "--entrypoint",
                    request.entrypoint,
                    "--arg",
                    parameter.as_str(),
                    "--burn-cap",
                    BURN_CAP,
                ],
            )
            .await?;

        capture(&OPERATION_HASH_REGEX, &output, "operation hash")
    }
}

#[cfg(test)]
mod tests {
    use super::{
        classify_counter, classify_failure, is_already_revealed, parse_counter, parse_origination,
    };
    use crate::errors::ClientError;

    const ORIGINATION_OUTPUT: &str = "\
Node is bootstrapped.
Estimated gas: 1420.040 units (will add 100 for safety)
Operation successfully injected in the node.
Operation hash is 'ooYdFPx2bTF4gHUzDLbDTf8JJHvyDsjP4UzyaVSgJCpBqHvNbNo'
Waiting for the operation to be included...
Operation found in block: BLTzCQnFVXSR7FjVP5AV5WbZhNaGQBvzfYpq1vHBqHFoSL9QJ4u (pass: 3, offset: 0)
          Originated contracts:
            KT1VYsVfmobT7rsMVivvZ4J8i3bPiqz12NaH
New contract KT1VYsVfmobT7rsMVivvZ4J8i3bPiqz12NaH originated.
Contract memorized as murmuration-testnet-token.
";

    #[test]
    fn test_parse_origination() {
        let result = parse_origination(ORIGINATION_OUTPUT).unwrap();
        assert_eq!(
            result.contract_address.as_str(),
            "KT1VYsVfmobT7rsMVivvZ4J8i3bPiqz12NaH"
        );
        assert_eq!(
            result.operation_hash,
            "ooYdFPx2bTF4gHUzDLbDTf8JJHvyDsjP4UzyaVSgJCpBqHvNbNo"
        );
    }

    #[test]
    fn test_parse_origination_without_contract() {
        let output = "Operation hash is 'ooYdFPx2bTF4gHUzDLbDTf8JJHvyDsjP4UzyaVSgJCpBqHvNbNo'";
        assert!(matches!(
            parse_origination(output),
            Err(ClientError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("\"1042\"\n").unwrap(), 1042);
        assert_eq!(parse_counter("7").unwrap(), 7);
        assert!(parse_counter("\"abc\"").is_err());
    }

    #[test]
    fn test_classify_failure() {
        let rejected = classify_failure(
            "",
            "Error:\n  Balance of contract tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb too low (0) to spend 1",
        );
        assert!(matches!(rejected, ClientError::Rejected(_)));
        assert!(!rejected.is_retryable());

        let script_failure = classify_failure("", "script_rejected: NOT_ADMINISTRATOR");
        assert!(!script_failure.is_retryable());

        let transient = classify_failure("", "Unable to connect to the node: \"Connection refused\"");
        assert!(matches!(transient, ClientError::Transient(_)));
        assert!(transient.is_retryable());
    }

    #[test]
    fn test_counter_matches_node() {
        assert!(classify_counter(41, 42).is_ok());
    }

    #[test]
    fn test_node_behind_counter_is_transient() {
        let err = classify_counter(40, 42).unwrap_err();
        assert!(matches!(err, ClientError::Transient(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_node_ahead_of_counter_is_a_mismatch() {
        let err = classify_counter(42, 42).unwrap_err();
        assert!(matches!(
            err,
            ClientError::CounterMismatch {
                expected: 42,
                found: 43
            }
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_already_revealed() {
        let revealed = classify_failure(
            "",
            "Error:\n  The operation is invalid: previously_revealed_key tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb",
        );
        assert!(is_already_revealed(&revealed));
        assert!(is_already_revealed(&ClientError::Transient(
            "Public key already revealed.".to_string()
        )));

        let unreachable = classify_failure("", "Unable to connect to the node");
        assert!(!is_already_revealed(&unreachable));
    }

    #[cfg(unix)]
    mod octez {
        use std::{fs, os::unix::fs::PermissionsExt, path::Path};

        use tempfile::tempdir;

        use crate::{
            client::{OctezClient, OperationClient, OriginationRequest},
            michelson::MichelsonValue,
        };

        const ENDPOINT: &str = "http://localhost:8732";
        const SECRET_KEY: &str = "edsk3QoqBuvdamxouPhin7swCvkQNgq4jP5KZPbwWNnwdZpSpJiEbq";

        /// A stand-in for `octez-client` that keeps the deployer's counter in
        /// a file and reveals the key with the first manager operation, like
        /// the real client does
        const FAKE_CLIENT: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
echo "$@" >> "$dir/argv.log"
while [ $# -gt 0 ]; do
  case "$1" in
    --base-dir|--password-filename|--endpoint) shift 2 ;;
    *) break ;;
  esac
done
counter=$(cat "$dir/counter")
auto_reveal() {
  if [ ! -f "$dir/revealed" ]; then
    touch "$dir/revealed"
    counter=$((counter + 1))
  fi
}
case "$1 $2" in
  "encrypt secret")
    read -r key
    read -r password
    read -r confirmation
    [ "$password" = "$confirmation" ] || { echo "passwords differ" >&2; exit 1; }
    printf '%s' "$key" > "$dir/secret"
    echo "Encrypted secret key: encrypted:edesk1fake" ;;
  "import secret")
    [ "$5" = "encrypted:edesk1fake" ] || { echo "bad key $5" >&2; exit 1; } ;;
  "show address")
    echo "Hash: tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb" ;;
  "reveal key")
    if [ -f "$dir/revealed" ]; then
      echo "Error: previously revealed key" >&2
      exit 1
    fi
    auto_reveal
    echo "Operation hash is 'ooYdFPx2bTF4gHUzDLbDTf8JJHvyDsjP4UzyaVSgJCpBqHvNbNo'" ;;
  "rpc get")
    printf '"%s"\n' "$counter" ;;
  "originate contract")
    [ -f "$9" ] || { echo "no file $9" >&2; exit 1; }
    auto_reveal
    counter=$((counter + 1))
    echo "Operation hash is 'ooYdFPx2bTF4gHUzDLbDTf8JJHvyDsjP4UzyaVSgJCpBqHvNbNo'"
    echo "New contract KT1VYsVfmobT7rsMVivvZ4J8i3bPiqz12NaH originated." ;;
  *)
    echo "unknown command $*" >&2
    exit 1 ;;
esac
echo "$counter" > "$dir/counter"
"#;

        /// Installs the fake client in `dir` with the deployer at `counter`
        fn install(dir: &Path, counter: u64) -> OctezClient {
            let binary = dir.join("octez-client");
            fs::write(&binary, FAKE_CLIENT).unwrap();
            fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();
            fs::write(dir.join("counter"), counter.to_string()).unwrap();

            OctezClient::new(binary, Some(dir.to_path_buf()))
        }

        #[tokio::test]
        async fn test_secret_key_is_never_an_argument() {
            let dir = tempdir().unwrap();
            let client = install(dir.path(), 100);

            let deployer = client
                .import_deployer(&format!("unencrypted:{SECRET_KEY}"), ENDPOINT)
                .await
                .unwrap();

            assert_eq!(
                deployer.address.as_str(),
                "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb"
            );
            assert_eq!(fs::read_to_string(dir.path().join("secret")).unwrap(), SECRET_KEY);

            let argv = fs::read_to_string(dir.path().join("argv.log")).unwrap();
            assert!(!argv.contains(SECRET_KEY));
            let encrypt = argv.lines().find(|line| line.contains("encrypt")).unwrap();
            assert!(!encrypt.contains("--password-filename"));
            let import = argv.lines().find(|line| line.contains("import")).unwrap();
            assert!(import.contains("--password-filename"));
        }

        #[tokio::test]
        async fn test_reveal_consumes_a_counter_once() {
            let dir = tempdir().unwrap();
            let client = install(dir.path(), 100);
            let deployer = client.import_deployer(SECRET_KEY, ENDPOINT).await.unwrap();

            assert!(client.reveal_deployer(&deployer, ENDPOINT).await.unwrap());
            assert!(!client.reveal_deployer(&deployer, ENDPOINT).await.unwrap());
            assert_eq!(
                client
                    .fetch_counter(&deployer.address, ENDPOINT)
                    .await
                    .unwrap(),
                101
            );
        }

        #[tokio::test]
        async fn test_originate_passes_the_source_file() {
            let dir = tempdir().unwrap();
            let client = install(dir.path(), 100);
            let deployer = client.import_deployer(SECRET_KEY, ENDPOINT).await.unwrap();
            client.reveal_deployer(&deployer, ENDPOINT).await.unwrap();

            let source = dir.path().join("token.tz");
            fs::write(&source, "parameter unit; storage unit; code { CDR ; NIL operation ; PAIR }")
                .unwrap();
            let result = client
                .originate(&OriginationRequest {
                    alias: "murmuration-sandbox-token",
                    source: &source,
                    storage: &MichelsonValue::Unit,
                    deployer: &deployer,
                    counter: 102,
                    endpoint: ENDPOINT,
                })
                .await
                .unwrap();

            assert_eq!(
                result.contract_address.as_str(),
                "KT1VYsVfmobT7rsMVivvZ4J8i3bPiqz12NaH"
            );
            let argv = fs::read_to_string(dir.path().join("argv.log")).unwrap();
            assert!(argv.contains(&format!("running {}", source.display())));
            assert!(!argv.contains("CDR"));
        }
    }
}
