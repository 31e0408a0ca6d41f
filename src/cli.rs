use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select, Text};
use workoutBooking::config::BookingConfig;
use workoutBooking::models::form::{AgeInput, FieldEdit, FormField, PhotoFile};
use workoutBooking::render::{render_errors, render_holidays, render_month};
use workoutBooking::runtime::{today_in, BookingSession};
use workoutBooking::service::calendar::build_month_grid;
use workoutBooking::service::holiday_service::{HolidayService, HolidaySource};
use workoutBooking::service::submission::SubmitOutcome;
use workoutBooking::service::validation::parse_date_input;

const HOLIDAY_WAIT: Duration = Duration::from_secs(5);

const ALL_FIELDS: [FormField; 7] = [
    FormField::FirstName,
    FormField::LastName,
    FormField::Email,
    FormField::Age,
    FormField::Photo,
    FormField::Date,
    FormField::Time,
];

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in and send a training application.
    Book,
    /// Print a month with Sundays and holidays marked.
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12
        #[arg(long)]
        month: Option<u32>,
    },
    /// List the public holidays of a year.
    Holidays {
        #[arg(long)]
        year: Option<i32>,
    },
}

pub async fn cli(config: Arc<BookingConfig>) {
    // Fine to exit on bad arguments here
    let cli = Cli::parse();
    let today = today_in(config.timezone);
    match &cli.command {
        Commands::Book => {
            if let Err(e) = book(config.clone()).await {
                println!("Booking aborted: {}", e);
            }
        }
        Commands::Calendar { year, month } => {
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            if let Err(e) = print_calendar(&config, year, month).await {
                println!("Failed to print calendar: {}", e);
            }
        }
        Commands::Holidays { year } => {
            let year = year.unwrap_or(today.year());
            let service = HolidayService::from_config(&config);
            match service.holidays_for_year(year).await {
                Ok(holidays) => print!("{}", render_holidays(year, &holidays)),
                Err(e) => println!("Failed to fetch holidays: {}", e),
            }
        }
    }
}

async fn print_calendar(
    config: &BookingConfig,
    year: i32,
    month: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(1..=12).contains(&month) {
        return Err(format!("month must be between 1 and 12, got {}", month).into());
    }
    let service = HolidayService::from_config(config);
    let holidays = match service.holidays_for_year(year).await {
        Ok(holidays) => holidays,
        Err(e) => {
            println!("Warning: holiday information is currently not available ({})", e);
            Vec::new()
        }
    };
    let grid = build_month_grid(year, month - 1, &holidays, None)?;
    print!("{}", render_month(&grid));
    Ok(())
}

async fn book(config: Arc<BookingConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let timezone = config.timezone;
    let mut session = BookingSession::from_config(config, today_in(timezone));
    let mut pending: Vec<FormField> = ALL_FIELDS.to_vec();

    loop {
        for field in &pending {
            prompt_field(&mut session, *field).await?;
        }

        if !session.can_submit() {
            println!("Some required fields are still empty.");
        }
        if !Confirm::new("Send application?").with_default(true).prompt()? {
            return Ok(());
        }

        println!("Sending...");
        match session.submit(today_in(timezone)).await {
            SubmitOutcome::Succeeded => {
                println!("Submitted successfully!");
                return Ok(());
            }
            SubmitOutcome::Invalid(errors) => {
                println!("Please correct the following:\n{}", render_errors(&errors));
                pending = errors
                    .fields()
                    .filter(|field| *field != FormField::General)
                    .collect();
                if pending.is_empty() {
                    pending = ALL_FIELDS.to_vec();
                }
            }
            SubmitOutcome::Failed(message) => {
                println!("{}", message);
                pending = Vec::new();
                if !Confirm::new("Try again?").with_default(true).prompt()? {
                    return Ok(());
                }
            }
            SubmitOutcome::Busy => {
                pending = Vec::new();
            }
        }
    }
}

async fn prompt_field(
    session: &mut BookingSession,
    field: FormField,
) -> Result<(), Box<dyn std::error::Error>> {
    let fields = session.form().fields().clone();
    match field {
        FormField::FirstName => {
            let value = Text::new("First Name").with_initial_value(&fields.first_name).prompt()?;
            session.edit(FieldEdit::FirstName(value));
        }
        FormField::LastName => {
            let value = Text::new("Last Name").with_initial_value(&fields.last_name).prompt()?;
            session.edit(FieldEdit::LastName(value));
        }
        FormField::Email => {
            let value = Text::new("Email Address").with_initial_value(&fields.email).prompt()?;
            session.edit(FieldEdit::Email(value));
        }
        FormField::Age => {
            let current = match &fields.age {
                AgeInput::Years(years) => years.to_string(),
                AgeInput::NotANumber(raw) => raw.clone(),
            };
            let value = Text::new("Age (8-100)").with_initial_value(&current).prompt()?;
            session.edit(FieldEdit::Age(AgeInput::parse(&value)));
        }
        FormField::Photo => {
            let current = fields.photo.as_ref().map(|photo| photo.name.clone()).unwrap_or_default();
            let value = Text::new("Photo (path to an image, max 5MB)")
                .with_initial_value(&current)
                .prompt()?;
            let value = value.trim();
            if value.is_empty() {
                session.edit(FieldEdit::Photo(None));
            } else if value != current {
                match PhotoFile::from_path(Path::new(value)).await {
                    Ok(photo) => {
                        session.edit(FieldEdit::Photo(Some(photo)));
                    }
                    Err(e) => {
                        println!("Could not read {}: {}", value, e);
                        session.edit(FieldEdit::Photo(None));
                    }
                }
            }
        }
        FormField::Date => prompt_date(session).await?,
        FormField::Time => {
            if !session.shows_time_slots() {
                return Ok(());
            }
            let slots = session.form().config().time_slots.clone();
            let cursor = fields
                .time_slot()
                .and_then(|time| slots.iter().position(|slot| slot == time))
                .unwrap_or(0);
            let time = Select::new("Time", slots).with_starting_cursor(cursor).prompt()?;
            session.edit(FieldEdit::Time(Some(time)));
        }
        FormField::General => {}
    }
    Ok(())
}

async fn prompt_date(session: &mut BookingSession) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let _ = tokio::time::timeout(HOLIDAY_WAIT, session.holidays().settled()).await;
        print!("{}", render_month(&session.month_grid()?));
        if let Some(error) = session.calendar_error() {
            println!("! {}", error);
        }

        let input = Text::new("Date: day number or YYYY-MM-DD, '<' / '>' to change month, empty to keep")
            .prompt()?;
        let input = input.trim();
        if input.is_empty() {
            break;
        }
        if input == "<" {
            session.previous_month();
            continue;
        }
        if input == ">" {
            session.next_month();
            continue;
        }
        let date = match input.parse::<u32>() {
            Ok(day) => session.calendar().date_for_day(day),
            Err(_) => match parse_date_input(input) {
                Ok(date) => {
                    session.show_month_of(date);
                    let _ = tokio::time::timeout(HOLIDAY_WAIT, session.holidays().settled()).await;
                    Some(date)
                }
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            },
        };
        let Some(date) = date else {
            println!("No such day in {}.", session.calendar().label());
            continue;
        };
        if session.select_date(date) {
            break;
        }
        if session.holidays_for(date.year()).is_none() {
            println!("Holidays for {} are still loading, try again.", date.year());
        } else {
            println!("That day cannot be booked.");
        }
    }

    for notice in session.date_notices() {
        println!("! {}", notice);
    }
    Ok(())
}
