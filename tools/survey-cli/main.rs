use clap::{Args, Parser, Subcommand};
use std::time::Instant;
use survey_flow::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Builds IVR survey call flows and publishes them to a flow backend
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the flow plan and print it, without touching any backend
    Plan {
        #[command(flatten)]
        survey: SurveyArgs,
        /// Print the plan as JSON instead of the text listing
        #[arg(long)]
        json: bool,
        /// Also save the plan as a binary artifact at this path
        #[arg(long)]
        save: Option<String>,
    },
    /// Build the flow, replay it against the backend, validate and publish
    Publish {
        #[command(flatten)]
        survey: SurveyArgs,
        #[command(flatten)]
        session: SessionArgs,
        /// Validate only, never publish
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args, Debug)]
struct SurveyArgs {
    /// Survey config JSON; the flags below override its fields
    #[arg(short, long)]
    config: Option<String>,
    #[arg(long)]
    flow_name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    questions: Option<i64>,
    #[arg(long)]
    close_the_loop: Option<bool>,
    #[arg(long, allow_hyphen_values = true)]
    loop_count: Option<i64>,
    #[arg(long)]
    data_action_id: Option<String>,
    /// Use the fixed nested-decision demo flow instead of the survey
    #[arg(long)]
    demo: bool,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct SessionArgs {
    #[arg(long, default_value = "prod_us_east_1")]
    location: String,
    #[arg(long, env = "SURVEY_FLOW_CLIENT_ID", default_value = "", hide_env_values = true)]
    client_id: String,
    #[arg(long, env = "SURVEY_FLOW_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    client_secret: String,
    /// The client was registered for the client-credentials grant
    /// instead of the authorization-code grant
    #[arg(long)]
    client_credentials: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Plan { survey, json, save } => {
            let config = run_config(&survey, false);
            init_tracing(&config);
            run_plan(&survey, &config, json, save);
        }
        Command::Publish {
            survey,
            session,
            dry_run,
        } => {
            let mut config = run_config(&survey, dry_run);
            config.session = session_config(session);
            init_tracing(&config);
            run_publish(&survey, config).await;
        }
    }
}

// Logs go to stderr; stdout only carries the plan or the run result.
fn init_tracing(config: &RunConfig) {
    let default = if config.verbose {
        "survey_flow=debug,survey_cli=debug,warn"
    } else {
        "survey_flow=info,survey_cli=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_config(args: &SurveyArgs, dry_run: bool) -> RunConfig {
    RunConfig {
        survey: survey_config(args),
        verbose: args.verbose,
        dry_run,
        ..RunConfig::default()
    }
}

fn session_config(args: SessionArgs) -> SessionConfig {
    let location: Location = args
        .location
        .parse()
        .unwrap_or_else(|e| exit_with_error(&format!("Configuration error: {}", e)));
    SessionConfig {
        location,
        client_id: args.client_id,
        client_secret: args.client_secret,
        grant: if args.client_credentials {
            GrantType::ClientCredentials
        } else {
            GrantType::AuthorizationCode
        },
    }
}

fn survey_config(args: &SurveyArgs) -> SurveyConfig {
    let mut config = match &args.config {
        Some(path) => SurveyConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load survey config: {}", e))),
        None => SurveyConfig::default(),
    };
    if let Some(name) = &args.flow_name {
        config.flow_name = name.clone();
    }
    if let Some(description) = &args.description {
        config.flow_description = description.clone();
    }
    if let Some(questions) = args.questions {
        config.number_of_questions = questions;
    }
    if let Some(close_the_loop) = args.close_the_loop {
        config.has_close_the_loop = close_the_loop;
    }
    if let Some(loop_count) = args.loop_count {
        config.loop_count = loop_count;
    }
    if let Some(id) = &args.data_action_id {
        config.data_action_id = id.clone();
    }
    config
}

fn build_plan(args: &SurveyArgs, survey: &SurveyConfig) -> FlowPlan {
    let result = if args.demo {
        build_decision_demo(&survey.flow_name, &survey.flow_description)
    } else {
        Planner::builder(survey.clone()).build().plan()
    };
    result.unwrap_or_else(|e| exit_with_error(&format!("Configuration error: {}", e)))
}

fn run_plan(args: &SurveyArgs, config: &RunConfig, json: bool, save: Option<String>) {
    let start = Instant::now();
    let plan = build_plan(args, &config.survey);
    info!(tasks = plan.tasks.len(), elapsed = ?start.elapsed(), "plan built");

    if json {
        let rendered = plan
            .to_json_pretty()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize plan: {}", e)));
        println!("{}", rendered);
    } else {
        println!("{}", PlanVisualizer::render(&plan));
    }

    if let Some(path) = save {
        plan.save(&path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save plan: {}", e)));
        info!(path = %path, "plan artifact written");
    }
}

async fn run_publish(args: &SurveyArgs, config: RunConfig) {
    let backend = InMemoryBackend::connect(&config.session)
        .unwrap_or_else(|e| report_failure(&OrchestratorError::Backend(e)));
    let orchestrator = Orchestrator::new(backend, config);

    let start = Instant::now();
    let result = if args.demo {
        let plan = build_plan(args, &orchestrator.config().survey);
        orchestrator.replay(&plan).await
    } else {
        orchestrator.run().await
    };

    match result {
        Ok(RunOutcome::Published(published)) => {
            println!("\nFlow published: {}", published.url);
            if published.replaced_existing {
                println!("  -> An existing flow with the same name was replaced");
            }
        }
        Ok(RunOutcome::Validated(_)) => {
            println!("\nDry run: the flow validated cleanly and was not published");
        }
        Err(e) => report_failure(&e),
    }
    println!("Total Execution:      {:?}", start.elapsed());
}

fn report_failure(error: &OrchestratorError) -> ! {
    if let OrchestratorError::ValidationFailed(validation) = error {
        for message in &validation.messages {
            eprintln!("  {:?}: {}", message.severity, message.text);
        }
    }
    let cause = match error.cause() {
        FailureCause::Configuration => "configuration",
        FailureCause::Backend => "backend",
        FailureCause::Validation => "validation",
    };
    exit_with_error(&format!("Run failed ({}): {}", cause, error))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
