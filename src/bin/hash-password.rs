//! Prints a bcrypt hash of the admin password for the env file.

use bcrypt::{hash, verify, DEFAULT_COST};
use std::env;

fn main() {
    let password = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --bin hash-password <PASSWORD>");
        std::process::exit(1);
    });

    if password.trim().len() < 8 {
        eprintln!("Refusing to hash a password shorter than 8 characters.");
        std::process::exit(1);
    }

    let hashed = match hash(&password, DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    };

    // Round-trip the hash before printing it
    if !matches!(verify(&password, &hashed), Ok(true)) {
        eprintln!("Generated hash failed verification; try again.");
        std::process::exit(1);
    }

    println!("\nCost     : {}", DEFAULT_COST);
    println!("Hash     : {}\n", hashed);
    println!("# Paste this into your .env, then send the plain password as");
    println!("# `Authorization: Bearer <password>` to /api/admin/*");
    println!("ADMIN_HASH_PASSWORD={}", hashed);
}
