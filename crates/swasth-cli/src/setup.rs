//! Interactive profile setup

use std::io::Write;

use anyhow::{Context, Result};

use swasth_core::profile::{ActivityLevel, DietPreference, Gender, Goal, UserProfile};

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    Ok(line.trim().to_string())
}

fn prompt_parsed<T: std::str::FromStr>(label: &str) -> Result<T> {
    loop {
        let input = prompt(label)?;
        match input.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Please enter a valid value."),
        }
    }
}

/// Present numbered options and return the chosen one.
fn prompt_choice<T: Copy>(label: &str, options: &[(T, &str)]) -> Result<T> {
    println!("{label}:");
    for (i, (_, text)) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, text);
    }
    loop {
        let input = prompt("Choice")?;
        if let Ok(n) = input.parse::<usize>() {
            if n >= 1 && n <= options.len() {
                return Ok(options[n - 1].0);
            }
        }
        println!("Please enter a number between 1 and {}.", options.len());
    }
}

/// Collect a complete profile from the terminal.
pub fn collect_profile() -> Result<UserProfile> {
    let mut profile = UserProfile::new();

    profile.age = Some(prompt_parsed("Age")?);
    profile.gender = Some(prompt_choice(
        "Gender",
        &[(Gender::Male, "Male"), (Gender::Female, "Female")],
    )?);
    profile.weight_kg = Some(prompt_parsed("Weight (kg)")?);
    profile.height_cm = Some(prompt_parsed("Height (cm)")?);

    let activity_options: Vec<(ActivityLevel, &str)> = ActivityLevel::ALL
        .iter()
        .map(|level| (*level, level.label()))
        .collect();
    profile.activity_level = Some(prompt_choice("Activity level", &activity_options)?);

    let goal_options: Vec<(Goal, &str)> =
        Goal::ALL.iter().map(|goal| (*goal, goal.label())).collect();
    profile.goal = Some(prompt_choice("Goal", &goal_options)?);

    profile.region = Some(prompt("Preferred cuisine (e.g. North Indian)")?);

    let diet_options: Vec<(DietPreference, &str)> = DietPreference::ALL
        .iter()
        .map(|diet| (*diet, diet.label()))
        .collect();
    profile.diet_preference = Some(prompt_choice("Dietary preference", &diet_options)?);

    let allergies = prompt("Allergies (comma-separated, or leave blank)")?;
    profile.allergies = allergies
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let language = prompt("Preferred language (default English)")?;
    if !language.is_empty() {
        profile.language = language;
    }

    Ok(profile)
}

/// Ask for a fresh weight reading. Blank input keeps the stored value.
pub fn ask_weight_update() -> Result<Option<f64>> {
    println!("It's been a while since your last weight update.");
    loop {
        let input = prompt("Current weight in kg (leave blank to keep)")?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<f64>() {
            Ok(weight) if weight > 0.0 => return Ok(Some(weight)),
            _ => println!("Please enter a valid weight."),
        }
    }
}
