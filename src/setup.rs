//! Interactive setup wizard.
//!
//! Collects the four deployment values (SendGrid key, from-address, Google
//! Sheets id and credentials), writes `.env` plus a Netlify copy/paste
//! listing, and prints advisory format checks. Prompting runs over abstract
//! `BufRead`/`Write` handles so the whole flow is scriptable in tests.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const DEFAULT_FROM_EMAIL: &str = "orders@twoa.ac.nz";

/// The operator's answers, held in memory for the duration of the run.
#[derive(Debug, Clone)]
pub struct SetupAnswers {
    pub sendgrid_key: String,
    pub from_email: String,
    pub sheets_id: String,
    pub sheets_credentials: String,
}

/// Output file locations. Defaults match the deployed repo layout; tests
/// point these into a temp directory.
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub env_file: PathBuf,
    pub netlify_file: PathBuf,
}

impl Default for SetupPaths {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            netlify_file: PathBuf::from("netlify-env-vars.txt"),
        }
    }
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Runs the fixed sequence of prompts. An empty from-email answer falls back
/// to the default address.
pub fn prompt_answers(input: &mut impl BufRead, output: &mut impl Write) -> Result<SetupAnswers> {
    writeln!(
        output,
        "This script will help you set up the environment variables.\n"
    )?;

    let sendgrid_key = ask(input, output, "📧 Enter your SendGrid API Key (starts with SG.): ")?;

    let mut from_email = ask(
        input,
        output,
        "📮 From email address (e.g., orders@twoa.ac.nz): ",
    )?;
    if from_email.is_empty() {
        from_email = DEFAULT_FROM_EMAIL.to_string();
    }

    let sheets_id = ask(input, output, "📊 Google Sheets ID (from the URL): ")?;

    writeln!(output, "\n🔐 For Google Sheets credentials, please:")?;
    writeln!(output, "1. Copy the entire service account JSON file content")?;
    writeln!(output, "2. Paste it as a single line below\n")?;

    let sheets_credentials = ask(input, output, "📋 Google Sheets credentials (JSON): ")?;

    Ok(SetupAnswers {
        sendgrid_key,
        from_email,
        sheets_id,
        sheets_credentials,
    })
}

/// `.env` contents for local development. Pure function of the answers.
pub fn render_env_file(answers: &SetupAnswers) -> String {
    format!(
        "# Te Mata Wānanga Apparel Form Environment Variables
# ===============================================

# SendGrid Configuration
SENDGRID_API_KEY={key}
FROM_EMAIL={email}

# Google Sheets Configuration
GOOGLE_SHEETS_ID={id}
GOOGLE_SHEETS_CREDENTIALS={creds}

# Environment
NODE_ENV=development
",
        key = answers.sendgrid_key,
        email = answers.from_email,
        id = answers.sheets_id,
        creds = answers.sheets_credentials,
    )
}

/// Netlify listing: each bare key on its own line, value on the next,
/// formatted for pasting into the site settings UI.
pub fn render_netlify_vars(answers: &SetupAnswers) -> String {
    format!(
        "
📋 NETLIFY ENVIRONMENT VARIABLES
================================

Copy these to your Netlify site settings (Settings → Environment variables):

SENDGRID_API_KEY
{key}

FROM_EMAIL
{email}

GOOGLE_SHEETS_ID
{id}

GOOGLE_SHEETS_CREDENTIALS
{creds}

NODE_ENV
production
",
        key = answers.sendgrid_key,
        email = answers.from_email,
        id = answers.sheets_id,
        creds = answers.sheets_credentials,
    )
}

/// Four independent advisory checks. Failures never abort the run; the lines
/// are printed verbatim after the files are written.
pub fn validate_answers(answers: &SetupAnswers) -> Vec<String> {
    let mut validations = Vec::new();

    if answers.sendgrid_key.starts_with("SG.") {
        validations.push("✅ SendGrid API key format looks correct".to_string());
    } else {
        validations.push("❌ SendGrid API key should start with \"SG.\"".to_string());
    }

    if answers.from_email.contains('@') {
        validations.push("✅ From email format looks correct".to_string());
    } else {
        validations.push("❌ From email should be a valid email address".to_string());
    }

    if answers.sheets_id.len() > 20 {
        validations.push("✅ Sheets ID length looks correct".to_string());
    } else {
        validations.push("❌ Sheets ID seems too short".to_string());
    }

    if serde_json::from_str::<serde_json::Value>(&answers.sheets_credentials).is_ok() {
        validations.push("✅ Google credentials JSON format is valid".to_string());
    } else {
        validations.push("❌ Google credentials JSON format is invalid".to_string());
    }

    validations
}

fn print_next_steps(output: &mut impl Write) -> Result<()> {
    writeln!(output, "\n🎯 NEXT STEPS:")?;
    writeln!(output, "==============")?;
    writeln!(output, "1. Test locally: cargo run")?;
    writeln!(
        output,
        "2. Add environment variables to Netlify (see netlify-env-vars.txt)"
    )?;
    writeln!(output, "3. Deploy the site to Netlify")?;
    writeln!(output, "4. Test the complete workflow")?;
    writeln!(
        output,
        "\n📚 For detailed instructions, see the Complete Setup Guide"
    )?;
    writeln!(
        output,
        "\n🎉 Setup complete! Your apparel order system is ready to deploy."
    )?;
    Ok(())
}

/// Drives the whole wizard: prompt, write both files (overwriting any
/// previous contents), validate, print next steps. Validation failures are
/// advisory only and never change the outcome.
pub fn run_setup(
    input: &mut impl BufRead,
    output: &mut impl Write,
    paths: &SetupPaths,
) -> Result<()> {
    let answers = prompt_answers(input, output)?;

    fs::write(&paths.env_file, render_env_file(&answers))
        .with_context(|| format!("failed to write {}", paths.env_file.display()))?;
    writeln!(output, "\n✅ .env file created successfully!")?;

    fs::write(&paths.netlify_file, render_netlify_vars(&answers))
        .with_context(|| format!("failed to write {}", paths.netlify_file.display()))?;
    writeln!(
        output,
        "📄 netlify-env-vars.txt created with your environment variables"
    )?;

    writeln!(output, "\n🔍 Validating setup...")?;
    writeln!(output, "\nValidation Results:")?;
    for line in validate_answers(&answers) {
        writeln!(output, "{line}")?;
    }

    print_next_steps(output)?;

    Ok(())
}
