use actionpack_cloud::{amazon, oci};
use actionpack_core::InputSpec;
use clap::{Args, ValueEnum};

use crate::OutputFormat;
use crate::commands::print_inputs;

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Parameter set to print.
    pub set: ParamSet,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ParamSet {
    /// OCI list instances inputs.
    Oci,
    /// OCI attach volume inputs.
    OciAttachVolume,
    /// Amazon Service Catalog provision product inputs.
    AmazonProvisionProduct,
}

impl ParamSet {
    fn inputs(self) -> Vec<InputSpec> {
        match self {
            Self::Oci => oci::list_instances_input_specs(),
            Self::OciAttachVolume => oci::attach_volume_input_specs(),
            Self::AmazonProvisionProduct => amazon::provision_product_inputs(),
        }
    }
}

pub fn run(args: &ParamsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let inputs = args.set.inputs();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&inputs)?);
        }
        OutputFormat::Text => print_inputs(&inputs),
    }
    Ok(())
}
