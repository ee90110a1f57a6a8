//! Terminal study loop over the flashcard client.

use std::io::{self, BufRead, Write};

use promptcards::{Config, GatewayClient, GatewayError, Navigator, StudyFlow, Subject, View};
use study_core::Phase;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(backend = %config.backend_url, "starting study client");

    let gateway = GatewayClient::new(config.backend_url.clone());
    let mut flow = StudyFlow::new(gateway, config.advance_delay);
    let mut nav = Navigator::default();
    let mut subjects: Vec<Subject> = Vec::new();

    println!("Flashcard study client. Type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let result = match cmd {
            "help" => {
                print_help();
                Ok(())
            }
            "demo" => flow.start_demo().map(|_| show_card(&flow)),
            "gen" => {
                let api_key = std::env::var("API_KEY").unwrap_or_default();
                match flow.generate(rest, &api_key).await {
                    Ok(count) => {
                        println!("Loaded {count} cards.");
                        show_card(&flow);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            "login" | "register" => {
                let (email, password) = match rest.split_once(' ') {
                    Some(pair) => pair,
                    None => {
                        println!("usage: {cmd} <email> <password>");
                        continue;
                    }
                };
                let outcome = if cmd == "login" {
                    flow.login(email, password).await
                } else {
                    flow.register(email, password).await
                };
                match outcome {
                    Ok(()) => {
                        let _ = nav.go(View::Subjects);
                        println!("Signed in.");
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            "logout" => {
                flow.logout();
                let _ = nav.go(View::Auth);
                Ok(())
            }
            "subjects" => match flow.subjects().await {
                Ok(list) => {
                    for (i, s) in list.iter().enumerate() {
                        println!("{}. {} ({} cards) - {}", i + 1, s.name, s.card_count, s.prompt);
                    }
                    subjects = list;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "create" => match rest.split_once('|') {
                Some((name, prompt)) => match nav.go(View::CreateSubject) {
                    Ok(()) => {
                        let result = flow.create_subject(name.trim(), prompt.trim()).await;
                        if matches!(&result, Err(GatewayError::Auth(_))) {
                            let _ = nav.go(View::Auth);
                        } else {
                            let _ = nav.go(View::Subjects);
                        }
                        result.map(|s| println!("Created subject '{}'.", s.name))
                    }
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                },
                None => {
                    println!("usage: create <name> | <prompt>");
                    continue;
                }
            },
            "gencards" => {
                let picked = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| subjects.get(i).cloned());
                match picked {
                    Some(subject) => match flow.generate_for_subject(&subject).await {
                        Ok(count) => {
                            let _ = nav.go(View::Study);
                            println!("Generated {count} cards for '{}'.", subject.name);
                            show_card(&flow);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    },
                    None => {
                        println!("usage: gencards <number from 'subjects'>");
                        continue;
                    }
                }
            }
            "study" => {
                let picked = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| subjects.get(i).cloned());
                match picked {
                    Some(subject) => match flow.study_subject(&subject, 20).await {
                        Ok(count) => {
                            let _ = nav.go(View::Study);
                            println!("Studying {count} cards.");
                            show_card(&flow);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    },
                    None => {
                        println!("usage: study <number from 'subjects'>");
                        continue;
                    }
                }
            }
            "flip" => {
                flow.reveal();
                show_card(&flow);
                Ok(())
            }
            "y" | "n" => match flow.answer(cmd == "y").await {
                Ok(Some(report)) => {
                    println!("+{} XP", report.xp_gained);
                    if let Some(err) = report.progress_error {
                        println!("(progress not saved: {err})");
                    }
                    show_card(&flow);
                    Ok(())
                }
                Ok(None) => {
                    println!("Session already complete.");
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "stats" => {
                print_stats(&flow);
                Ok(())
            }
            "reset" => {
                flow.reset();
                show_card(&flow);
                Ok(())
            }
            "export" => {
                match flow.write_report(std::path::Path::new(".")) {
                    Ok(path) => println!("Report written to {}", path.display()),
                    Err(e) => println!("Export failed: {e}"),
                }
                Ok(())
            }
            "quit" | "exit" => break,
            "" => continue,
            other => {
                println!("Unknown command '{other}'. Type 'help'.");
                continue;
            }
        };

        if let Err(e) = result {
            println!("Error: {e}");
        }
    }

    Ok(())
}

fn print_help() {
    println!("  demo                 load the built-in demo deck");
    println!("  gen <prompt>         generate cards (API_KEY env var required)");
    println!("  login <email> <pw>   sign in");
    println!("  register <email> <pw> create an account");
    println!("  subjects             list subjects");
    println!("  create <name> | <prompt>  create a subject");
    println!("  gencards <n>         generate cards for a listed subject");
    println!("  study <n>            study a listed subject");
    println!("  flip                 reveal/hide the answer");
    println!("  y / n                mark correct / incorrect");
    println!("  stats / reset / export / quit");
}

fn show_card(flow: &StudyFlow) {
    let controller = flow.controller();
    match controller.phase() {
        Phase::Complete => {
            if controller.deck_len() > 0 {
                let stats = controller.stats();
                println!("Session complete!");
                println!(
                    "  {} correct, {} incorrect, best streak {}, {} XP, level {} ({}%)",
                    stats.correct,
                    stats.incorrect,
                    stats.max_streak,
                    stats.xp,
                    stats.level,
                    stats.accuracy()
                );
            } else {
                println!("No deck loaded.");
            }
        }
        Phase::Active => {
            let card = controller.current().expect("active session has a card");
            println!(
                "Card {} of {} [{} / {}]",
                controller.current_card() + 1,
                controller.deck_len(),
                card.category,
                card.difficulty.as_str()
            );
            if controller.show_answer() {
                println!("  A: {}", card.back);
            } else {
                println!("  Q: {}  ('flip' to reveal)", card.front);
            }
        }
    }
}

fn print_stats(flow: &StudyFlow) {
    let stats = flow.controller().stats();
    println!(
        "Level {} | {} XP | streak {} (best {}) | {} correct / {} incorrect | {}%",
        stats.level,
        stats.xp,
        stats.streak,
        stats.max_streak,
        stats.correct,
        stats.incorrect,
        stats.accuracy()
    );
}
