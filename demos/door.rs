//! Door State Machine
//!
//! This example demonstrates a small machine with a wildcard transition,
//! a static start value, ready callbacks and strict mode.
//!
//! Run with: cargo run --example door

use juncture::{Hook, StateMachineBuilder, Transit, TransitionBuilder};

#[derive(Clone, Copy, PartialEq, Debug)]
enum Door {
    Closed,
    Open,
    Locked,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Door State Machine ===\n");

    let machine = StateMachineBuilder::<Door, String>::new()
        .name("door")
        .state_limit(3)
        .strict(true)
        .transition(TransitionBuilder::new().from_initial().to(Door::Closed))?
        .transition(
            TransitionBuilder::new()
                .from(Door::Closed)
                .to(Door::Open)
                .on_start(|_, _, _, args, _| {
                    Ok(Transit::Done(Some(args.unwrap_or_else(|| "creak".to_string()))))
                })
                .on_exit(|_, _, _, sound| {
                    println!("  door opens: {}", sound.map_or("", String::as_str));
                    Ok(())
                }),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Door::Closed)
                .to(Door::Locked)
                .start_with("click".to_string()),
        )?
        .transition(TransitionBuilder::new().from_any().to(Door::Closed))?
        .build()?;

    let trace: Hook<Door, String> = Hook::new(|_, from, to, args| {
        println!("  {from:?} -> {to:?} ({args:?})");
        Ok(())
    });

    machine
        .to(Door::Closed, None, Some(trace.clone()))?
        .to(Door::Open, None, Some(trace.clone()))?
        .to(Door::Closed, None, Some(trace.clone()))?
        .to(Door::Locked, None, Some(trace))?;

    match machine.request(Door::Open) {
        Ok(_) => println!("\nUnexpectedly opened a locked door"),
        Err(error) => println!("\nRejected: {error}"),
    }

    println!("History (last {}): {:?}", machine.state_limit(), machine.history());
    println!("\n=== Example Complete ===");
    Ok(())
}
