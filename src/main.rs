// src/main.rs
mod types;

use clap::Parser;
use kube_pki_bootstrap::cert::catalog::all_requests;
use kube_pki_bootstrap::cert::{CertificateInfo, CertificateOperations, CertificateVerifier};
use kube_pki_bootstrap::utils::logging::{ConsoleLogger, FileLogger, Logger, MultiLogger};
use kube_pki_bootstrap::ClusterConfig;
use serde::Serialize;
use std::io;
use std::path::Path;
use types::{Args, OutputFormat};

fn make_logger(args: &Args) -> io::Result<Box<dyn Logger>> {
    let mut logger = MultiLogger::new();
    logger.add(Box::new(ConsoleLogger::new(args.debug)));
    if let Some(log_file) = &args.log_file {
        let log_file = shellexpand::tilde(log_file).to_string();
        logger.add(Box::new(FileLogger::new(&log_file, args.debug)?));
    }
    Ok(Box::new(logger))
}

fn emit<T: Serialize>(value: &T, format: OutputFormat) -> io::Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
    };
    println!("{}", rendered);
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut logger = make_logger(&args)?;

    let config_path = shellexpand::tilde(&args.config).to_string();
    if !Path::new(&config_path).exists() {
        ClusterConfig::default().save_to_file(&config_path)?;
        logger.log(&format!(
            "No configuration found; wrote an example to {}. Edit it and run again.",
            config_path
        ));
        return Ok(());
    }

    let config = ClusterConfig::load_from_file(&config_path)?;
    config.validate()?;
    logger.debug_log(&format!("Loaded configuration from {}", config_path));

    let mut operations = CertificateOperations::new(logger);
    let (groups, bundle) = operations.generate(&config)?;
    CertificateVerifier::new(operations.into_logger()).verify_bundle(&bundle, &groups)?;

    if args.summary {
        let mut summary = Vec::new();
        for request in all_requests(&groups) {
            if let Some(cert_pem) = bundle.cert(&request.name) {
                summary.push(CertificateInfo::from_pem(&request.name, cert_pem)?);
            }
        }
        emit(&summary, args.format)
    } else {
        emit(&bundle.to_text_map(), args.format)
    }
}
