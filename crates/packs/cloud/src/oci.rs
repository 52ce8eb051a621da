//! Oracle Cloud Infrastructure inputs.

use actionpack_core::{CoreError, InputSpec, Inputs, Validation};
use actionpack_ssh::IdentityKey;
use reqwest::Url;
use tracing::debug;

use crate::error::CloudError;

// Common inputs.
pub const TENANCY_OCID: &str = "tenancyOcid";
pub const USER_OCID: &str = "userOcid";
pub const FINGER_PRINT: &str = "fingerPrint";
pub const PRIVATE_KEY_DATA: &str = "privateKeyData";
pub const PRIVATE_KEY_FILE: &str = "privateKeyFile";
pub const PROXY_HOST: &str = "proxyHost";
pub const PROXY_PORT: &str = "proxyPort";
pub const PROXY_USERNAME: &str = "proxyUsername";
pub const PROXY_PASSWORD: &str = "proxyPassword";
pub const API_VERSION: &str = "apiVersion";
pub const REGION: &str = "region";
pub const INSTANCE_ID: &str = "instanceId";
pub const AVAILABILITY_DOMAIN: &str = "availabilityDomain";
pub const VNIC_ID: &str = "vnicId";
pub const VNIC_ATTACHMENT_ID: &str = "vnicAttachmentId";
pub const VOLUME_ID: &str = "volumeId";
pub const VOLUME_ATTACHMENT_ID: &str = "volumeAttachmentId";
pub const PAGE: &str = "page";
pub const LIMIT: &str = "limit";

// List instances.
pub const COMPARTMENT_OCID: &str = "compartmentOcid";

// Attach volume.
pub const VOLUME_TYPE: &str = "volumeType";
pub const DEVICE_NAME: &str = "deviceName";
pub const DISPLAY_NAME: &str = "displayName";
pub const IS_READ_ONLY: &str = "isReadOnly";
pub const IS_SHAREABLE: &str = "isShareable";

pub const DEFAULT_API_VERSION: &str = "20160918";
pub const DEFAULT_PROXY_PORT: &str = "8080";

/// Inputs every OCI action takes.
pub fn common_input_specs() -> Vec<InputSpec> {
    vec![
        InputSpec::new(TENANCY_OCID)
            .required()
            .describe("OCID of the tenancy."),
        InputSpec::new(USER_OCID)
            .required()
            .describe("OCID of the user calling the API."),
        InputSpec::new(FINGER_PRINT)
            .required()
            .encrypted()
            .describe("Fingerprint of the public key added to the user."),
        InputSpec::new(PRIVATE_KEY_DATA)
            .encrypted()
            .describe("PEM private key. Use either this or privateKeyFile."),
        InputSpec::new(PRIVATE_KEY_FILE)
            .describe("Path of the PEM private key. Use either this or privateKeyData."),
        InputSpec::new(API_VERSION).default_value(DEFAULT_API_VERSION),
        InputSpec::new(REGION)
            .required()
            .describe("Region of the tenancy, for example us-ashburn-1."),
        InputSpec::new(PROXY_HOST),
        InputSpec::new(PROXY_PORT).default_value(DEFAULT_PROXY_PORT),
        InputSpec::new(PROXY_USERNAME),
        InputSpec::new(PROXY_PASSWORD).encrypted(),
    ]
}

pub fn list_instances_input_specs() -> Vec<InputSpec> {
    let mut specs = common_input_specs();
    specs.extend([
        InputSpec::new(COMPARTMENT_OCID)
            .required()
            .describe("OCID of the compartment to list."),
        InputSpec::new(AVAILABILITY_DOMAIN),
        InputSpec::new(DISPLAY_NAME),
        InputSpec::new(PAGE).describe("Pagination token from a previous call."),
        InputSpec::new(LIMIT).describe("Maximum number of items per page."),
    ]);
    specs
}

pub fn attach_volume_input_specs() -> Vec<InputSpec> {
    let mut specs = common_input_specs();
    specs.extend([
        InputSpec::new(INSTANCE_ID).required(),
        InputSpec::new(VOLUME_ID).required(),
        InputSpec::new(VOLUME_TYPE)
            .required()
            .describe("Attachment type: iscsi, emulated or paravirtualized."),
        InputSpec::new(DEVICE_NAME),
        InputSpec::new(DISPLAY_NAME),
        InputSpec::new(IS_READ_ONLY).default_value("false"),
        InputSpec::new(IS_SHAREABLE).default_value("false"),
    ]);
    specs
}

/// Validated common OCI inputs.
#[derive(Clone)]
pub struct OciCommonInputs {
    pub tenancy_ocid: String,
    pub user_ocid: String,
    pub finger_print: String,
    pub key: IdentityKey,
    pub api_version: String,
    pub region: String,
    pub proxy_host: String,
    pub proxy_port: String,
    pub proxy_username: String,
    pub proxy_password: String,
    pub page: String,
    pub limit: String,
}

impl std::fmt::Debug for OciCommonInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OciCommonInputs")
            .field("tenancy_ocid", &self.tenancy_ocid)
            .field("user_ocid", &self.user_ocid)
            .field("finger_print", &"[REDACTED]")
            .field("key", &self.key)
            .field("region", &self.region)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OciCommonInputs {
    pub fn from_inputs(inputs: &Inputs) -> Result<Self, CloudError> {
        let proxy_port = inputs.get_or(PROXY_PORT, DEFAULT_PROXY_PORT);
        let limit = inputs.get(LIMIT).trim();
        let key = IdentityKey::from_inputs(
            inputs.get(PRIVATE_KEY_FILE),
            inputs.get(PRIVATE_KEY_DATA),
            "",
        );

        let mut validation = Validation::new()
            .required(TENANCY_OCID, inputs.get(TENANCY_OCID))
            .required(USER_OCID, inputs.get(USER_OCID))
            .required(FINGER_PRINT, inputs.get(FINGER_PRINT))
            .required(REGION, inputs.get(REGION))
            .port(PROXY_PORT, &proxy_port);
        if !limit.is_empty() {
            validation = validation.non_negative_integer(LIMIT, limit);
        }
        let key = match key {
            Ok(key) => {
                validation.finish()?;
                key
            }
            Err(e) => {
                let messages = validation.error(e.to_string()).into_messages();
                return Err(CoreError::InvalidInputs(messages).into());
            }
        };
        Ok(Self {
            tenancy_ocid: inputs.get(TENANCY_OCID).trim().to_owned(),
            user_ocid: inputs.get(USER_OCID).trim().to_owned(),
            finger_print: inputs.get(FINGER_PRINT).trim().to_owned(),
            key,
            api_version: inputs.get_or(API_VERSION, DEFAULT_API_VERSION).trim().to_owned(),
            region: inputs.get(REGION).trim().to_owned(),
            proxy_host: inputs.get(PROXY_HOST).trim().to_owned(),
            proxy_port: proxy_port.trim().to_owned(),
            proxy_username: inputs.get(PROXY_USERNAME).to_owned(),
            proxy_password: inputs.get(PROXY_PASSWORD).to_owned(),
            page: inputs.get(PAGE).trim().to_owned(),
            limit: limit.to_owned(),
        })
    }

    /// Key id used to sign requests: `tenancy/user/fingerprint`.
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy_ocid, self.user_ocid, self.finger_print)
    }

    /// Host of the core services API in the configured region.
    pub fn api_host(&self) -> String {
        format!("iaas.{}.oraclecloud.com", self.region)
    }

    /// URL listing the instances of a compartment, with the paging inputs.
    pub fn list_instances_url(&self, compartment_ocid: &str) -> Result<Url, CloudError> {
        let base = format!("https://{}/{}/instances/", self.api_host(), self.api_version);
        let mut params = vec![("compartmentId", compartment_ocid)];
        if !self.page.is_empty() {
            params.push((PAGE, self.page.as_str()));
        }
        if !self.limit.is_empty() {
            params.push((LIMIT, self.limit.as_str()));
        }
        let url =
            Url::parse_with_params(&base, &params).map_err(|e| CloudError::Url(e.to_string()))?;
        debug!(%url, "built list instances URL");
        Ok(url)
    }
}
