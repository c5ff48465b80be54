use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use medconsult_lib::config::{ConsultConfig, ModelTask, APP_VERSION};
use medconsult_lib::history::{SqliteVitalsStore, Vitals, VitalsHistory};
use medconsult_lib::pipeline::inference::{OllamaClient, RetryingClient};
use medconsult_lib::pipeline::qa::MedicalQa;
use medconsult_lib::report::MedicalReport;
use medconsult_lib::workflow::WorkflowCoordinator;

#[derive(Parser)]
#[command(name = "medconsult")]
#[command(about = "Medical consultation workflows over a local Ollama model")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the diagnosis workflow and print the result as JSON
    Diagnose {
        /// Free-text symptom description
        symptoms: String,
    },
    /// Summarize a patient's recorded vitals
    Monitor {
        patient_id: String,
    },
    /// Append one set of vitals to the history store
    RecordVitals {
        patient_id: String,
        #[arg(long)]
        heart_rate: Option<f64>,
        #[arg(long)]
        temperature: Option<f64>,
        /// e.g. 120/80
        #[arg(long)]
        blood_pressure: Option<String>,
    },
    /// Ask a general medical question
    Ask {
        question: String,
    },
    /// Emergency triage for a symptom description
    Triage {
        symptoms: String,
    },
    /// Classify the intent of free text
    Classify {
        text: String,
    },
    /// Run the diagnosis workflow and print a patient report
    Report {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        gender: String,
        /// Known illnesses (optional)
        #[arg(long, default_value = "")]
        history: String,
        symptoms: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    medconsult_lib::init_tracing();

    let cli = Cli::parse();
    let config = ConsultConfig::from_env()?;
    tracing::info!("Medconsult v{}", APP_VERSION);

    match cli.command {
        Some(Commands::Diagnose { symptoms }) => {
            let mut coordinator = WorkflowCoordinator::from_config(&config)?;
            let outcome = coordinator.coordinate_diagnosis_workflow(&symptoms)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Some(Commands::Monitor { patient_id }) => {
            let mut coordinator = WorkflowCoordinator::from_config(&config)?;
            let outcome = coordinator.coordinate_monitoring_workflow(&patient_id)?;
            println!("{}", outcome.summary);
            if let Some(chart) = outcome.chart_ref {
                println!("Chart: {chart}");
            }
        }
        Some(Commands::RecordVitals {
            patient_id,
            heart_rate,
            temperature,
            blood_pressure,
        }) => {
            let store = SqliteVitalsStore::open(&config.history_db)?;
            let vitals = Vitals {
                heart_rate,
                temperature,
                blood_pressure,
            };
            let record = store.record(&patient_id, &vitals)?;
            println!("Recorded: {}", record.render());
        }
        Some(Commands::Ask { question }) => {
            let client = OllamaClient::new(
                &config.ollama_url,
                config.model_for(ModelTask::Diagnosis),
                config.timeout_secs,
            );
            let client = RetryingClient::new(
                client,
                config.max_retries,
                Duration::from_millis(config.retry_base_delay_ms),
            );
            let qa = MedicalQa::new(Arc::new(client));
            println!("{}", qa.answer(&question)?);
        }
        Some(Commands::Triage { symptoms }) => {
            let coordinator = WorkflowCoordinator::from_config(&config)?;
            let assessment = coordinator.emergency_triage(&symptoms);
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Some(Commands::Classify { text }) => {
            let coordinator = WorkflowCoordinator::from_config(&config)?;
            let record = coordinator.analyze_intent(&text);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Some(Commands::Report {
            name,
            age,
            gender,
            history,
            symptoms,
        }) => {
            let mut coordinator = WorkflowCoordinator::from_config(&config)?;
            let outcome = coordinator.coordinate_diagnosis_workflow(&symptoms)?;
            let report = MedicalReport {
                patient_name: name,
                age,
                gender,
                history,
                diagnosis: outcome.diagnosis,
                treatment: outcome.treatment,
            };
            println!("{}", report.render());
        }
        None => {
            println!("Use 'medconsult --help' for commands");
        }
    }

    Ok(())
}
