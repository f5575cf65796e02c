use crate::{constants::*, error::*, trace::*};
use std::path::{Path, PathBuf};
use x509_parser::prelude::{FromDer, X509Certificate};

/// A trusted CA certificate: owned DER bytes plus the metadata extracted when the
/// certificate was parsed at load time. Parsing happens exactly once per source; a
/// certificate that does not parse never makes it into the trusted set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaCertificate {
  der: Vec<u8>,
  subject: String,
  serial: String,
  not_after_unix: i64,
  is_ca: bool,
}

impl CaCertificate {
  /// Parse a certificate from DER bytes. `source` names the file or bag the bytes
  /// came from and is only used in error messages.
  pub fn from_der(der: Vec<u8>, source: &str) -> Result<Self> {
    let (rem, cert) = X509Certificate::from_der(&der)
      .map_err(|e| RpError::ParseCertificateError(source.to_string(), e.to_string()))?;
    if !rem.is_empty() {
      return Err(RpError::ParseCertificateError(
        source.to_string(),
        format!("{} trailing bytes after certificate", rem.len()),
      ));
    }
    let subject = cert.subject().to_string();
    let serial = cert.raw_serial_as_string();
    let not_after_unix = cert.validity().not_after.timestamp();
    let is_ca = cert
      .basic_constraints()
      .ok()
      .flatten()
      .map(|bc| bc.value.ca)
      .unwrap_or(false);
    Ok(Self {
      der,
      subject,
      serial,
      not_after_unix,
      is_ca,
    })
  }

  /// Parse a certificate from the content of a `.cer` file, which may be either
  /// PEM-armored or raw DER. A PEM file must contain exactly one CERTIFICATE block.
  pub fn from_cer_bytes(bytes: Vec<u8>, source: &str) -> Result<Self> {
    if !bytes.starts_with(b"-----BEGIN") {
      return Self::from_der(bytes, source);
    }
    let blocks = pem::parse_many(&bytes)
      .map_err(|e| RpError::ParseCertificateError(source.to_string(), e.to_string()))?;
    let mut certs = blocks.into_iter().filter(|b| b.tag() == "CERTIFICATE");
    let Some(block) = certs.next() else {
      return Err(RpError::ParseCertificateError(
        source.to_string(),
        "no CERTIFICATE block in PEM file".to_string(),
      ));
    };
    if certs.next().is_some() {
      return Err(RpError::ParseCertificateError(
        source.to_string(),
        "more than one CERTIFICATE block in PEM file".to_string(),
      ));
    }
    Self::from_der(block.into_contents(), source)
  }

  /// DER encoding of the certificate
  pub fn der(&self) -> &[u8] {
    &self.der
  }

  /// Subject distinguished name
  pub fn subject(&self) -> &str {
    &self.subject
  }

  /// Serial number as colon-separated hex
  pub fn serial(&self) -> &str {
    &self.serial
  }

  /// End of the validity period as unix seconds
  pub fn not_after_unix(&self) -> i64 {
    self.not_after_unix
  }

  /// Whether the certificate carries CA basic constraints
  pub fn is_ca(&self) -> bool {
    self.is_ca
  }
}

/// Directory holding the certificate resources of the given profile
fn profile_dir(certs_dir: &Path, active_profile: &str) -> PathBuf {
  certs_dir.join(active_profile)
}

/// Load trusted CA certificates from the loose `*.cer` files of the profile
/// directory, sorted by file name. Any I/O or parse error is fatal: a partially
/// loaded trust set is never returned.
pub fn load_ca_certificates_from_cer_files(certs_dir: &Path, active_profile: &str) -> Result<Vec<CaCertificate>> {
  let dir = profile_dir(certs_dir, active_profile);

  let mut cer_paths = std::fs::read_dir(&dir)?
    .collect::<std::result::Result<Vec<_>, _>>()?
    .into_iter()
    .map(|entry| entry.path())
    .filter(|path| path.is_file() && path.extension().map(|ext| ext == CERT_FILE_EXTENSION).unwrap_or(false))
    .collect::<Vec<_>>();
  cer_paths.sort();

  let mut ca_certificates = Vec::with_capacity(cer_paths.len());
  for path in &cer_paths {
    let bytes = std::fs::read(path)?;
    let cert = CaCertificate::from_cer_bytes(bytes, &path.display().to_string())?;
    debug!("Loaded trusted CA certificate {} from {}", cert.subject(), path.display());
    ca_certificates.push(cert);
  }
  info!(
    "Loaded {} trusted CA certificate(s) from *.cer files for the {} profile",
    ca_certificates.len(),
    active_profile
  );
  Ok(ca_certificates)
}

/// Load trusted CA certificates from the optional trust store of the profile
/// directory. An absent store is not an error and yields an empty list. A present
/// store is opened with the configured password; a missing password, a MAC mismatch
/// or a malformed store or certificate is fatal.
pub fn load_ca_certificates_from_trust_store(
  certs_dir: &Path,
  active_profile: &str,
  password: Option<&str>,
) -> Result<Vec<CaCertificate>> {
  let path = profile_dir(certs_dir, active_profile).join(TRUST_STORE_FILE_NAME);
  if !path.is_file() {
    info!(
      "Trust store file {} not found for the {} profile",
      TRUST_STORE_FILE_NAME, active_profile
    );
    return Ok(vec![]);
  }

  let Some(password) = password else {
    return Err(RpError::TrustStorePasswordMissing);
  };

  let bytes = std::fs::read(&path)?;
  let pfx = p12::PFX::parse(&bytes).map_err(|e| RpError::ParseTrustStoreError(format!("{e:?}")))?;
  if !pfx.verify_mac(password) {
    return Err(RpError::TrustStoreMacError);
  }
  let cert_bags = pfx
    .cert_bags(password)
    .map_err(|e| RpError::ParseTrustStoreError(format!("{e:?}")))?;

  let mut ca_certificates = Vec::with_capacity(cert_bags.len());
  for (i, der) in cert_bags.into_iter().enumerate() {
    let source = format!("{} bag {}", path.display(), i);
    let cert = CaCertificate::from_der(der, &source)?;
    debug!("Loaded trusted CA certificate {} from the trust store", cert.subject());
    ca_certificates.push(cert);
  }
  info!(
    "Loaded {} trusted CA certificate(s) from {} for the {} profile",
    ca_certificates.len(),
    TRUST_STORE_FILE_NAME,
    active_profile
  );
  Ok(ca_certificates)
}
