use clap::Args;
use std::sync::Arc;

use funding_desk::error::AppError;
use funding_desk::export;
use funding_desk::listing::applications::ApplicationRow;
use funding_desk::programs::{ProgramCatalog, ProgramConfigLoader};
use funding_desk::store::{ApplicationStore, MemoryStore};
use funding_desk::wizard::{
    DocumentSlot, IntakeService, SubmissionAssembler, WizardStateMachine, WizardStep,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Program to apply to (startup, innovation, sme, research)
    #[arg(long, default_value = "startup")]
    pub(crate) program: String,
    /// Skip the export rendering at the end of the demo
    #[arg(long)]
    pub(crate) skip_export: bool,
}

/// Drive one intake session end to end and print what a client would see.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = ProgramCatalog::builtin();
    println!("Funding application intake demo");
    println!("Available programs: {}", catalog.keys().join(", "));

    let mut machine = WizardStateMachine::new();
    machine.select_program(&catalog, &args.program)?;
    let Some(config) = machine.config().cloned() else {
        println!("No configuration loaded for '{}'", args.program);
        return Ok(());
    };
    println!(
        "\nSelected {} ({} - {} {}, decision in {})",
        config.program_name,
        config.funding_range.min,
        config.funding_range.max,
        config.funding_range.currency,
        config.processing_time.display()
    );

    let outcome = machine.next();
    println!(
        "Step {} -> {}",
        WizardStep::Program.label(),
        if outcome.advanced { "ok" } else { "blocked" }
    );

    // Deliberately try to advance an empty applicant step first.
    let blocked = machine.next();
    println!("\nAdvancing with an empty form is rejected:");
    for error in &blocked.errors {
        println!("  - {error}");
    }

    machine.set_applicant_field("fullName", "Alice Uwase");
    machine.set_applicant_field("email", "alice@example.com");
    machine.set_applicant_field("phone", "+250788123456");
    machine.set_applicant_field("dateOfBirth", "1990-04-12");
    machine.set_applicant_field("address", "KG 9 Ave 15");
    machine.set_applicant_field("city", "Kigali");
    machine.set_applicant_field("country", "Rwanda");

    machine.set_project_field("title", "Cold-chain logistics network");
    machine.set_project_field(
        "description",
        "A refrigerated last-mile delivery network connecting produce cooperatives \
         in the Northern Province with urban retailers, cutting post-harvest losses.",
    );
    machine.set_project_field("fundingAmount", config.funding_range.min.to_string());
    machine.set_project_field("duration", "12");
    machine.upload_document(DocumentSlot::BusinessPlan, "business-plan.pdf");
    machine.upload_document(DocumentSlot::FinancialStatements, "financials-fy24.xlsx");
    machine.set_terms(true);

    while machine.current_step() != WizardStep::Review {
        let step = machine.current_step();
        let outcome = machine.next();
        if !outcome.advanced {
            println!("\nStep {} still blocked:", step.label());
            for error in &outcome.errors {
                println!("  - {error}");
            }
            return Ok(());
        }
        println!("Step {} -> ok", step.label());
    }
    machine.complete();
    println!(
        "Uploaded documents: {}",
        machine.data().documents.summary()
    );

    let submission = match SubmissionAssembler.assemble(&machine) {
        Ok(submission) => submission,
        Err(err) => {
            println!("\nCould not assemble the submission: {err}");
            return Ok(());
        }
    };

    let store = Arc::new(MemoryStore::new());
    let service = IntakeService::new(store.clone(), store.clone());
    let receipt = match service.submit(&mut machine) {
        Ok(receipt) => receipt,
        Err(err) => {
            println!("\nSubmission rejected: {err}");
            return Ok(());
        }
    };

    println!("\nApplication accepted");
    println!("  Reference: {}", receipt.reference_number);
    println!("  Stored as: {}", receipt.application_id);
    println!("  Expected decision within: {}", receipt.processing_time);

    match store.list() {
        Ok(records) => {
            println!("\nApplications on file:");
            for record in &records {
                let row = ApplicationRow::from_record(record);
                println!(
                    "  {} | {} | {} | {} {}",
                    row.id,
                    row.applicant_name,
                    row.status.label(),
                    row.funding_amount,
                    config.funding_range.currency
                );
            }
        }
        Err(err) => println!("\nStore unavailable: {err}"),
    }

    for notification in store.notifications() {
        println!("\nNotification: {} - {}", notification.title, notification.message);
    }

    if !args.skip_export {
        println!("\n{}", export::submission_text(&submission, &config));
        match export::submission_csv(&submission) {
            Ok(csv) => println!("CSV export:\n{csv}"),
            Err(err) => println!("CSV export unavailable: {err}"),
        }
    }

    Ok(())
}
