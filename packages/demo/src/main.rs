use suspense_core::runtime::{Runtime, RuntimeGuard};
use suspense_demo::screen::{PostScreen, POST_IDS};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    let runtime = Runtime::new();
    let _guard = RuntimeGuard::new(runtime.clone());
    let mut screen = PostScreen::new(runtime.clone());

    println!("{}", screen.render());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    break;
                }
                match line.parse::<u32>() {
                    Ok(id) if POST_IDS.contains(&id) => {
                        screen.select(id);
                        // A settlement may have raced the selection; this
                        // render covers its mark too
                        runtime.take_dirty();
                        println!("{}", screen.render());
                    }
                    _ => print_help(),
                }
            }
            _ = runtime.wait_for_work() => {
                runtime.take_dirty();
                println!("{}", screen.render());
            }
        }
    }
}

fn print_help() {
    println!(
        "Select a post with {}-{}, or q to quit.",
        POST_IDS.start(),
        POST_IDS.end()
    );
}
