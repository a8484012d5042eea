// Test case for NO_PRINTLN lint

fn bad_println() {
    println!("activity 7 updated");
}

fn bad_eprintln() {
    eprintln!("store failed");
}

fn bad_dbg() {
    let x = 42;
    dbg!(x);
}

// Good: using tracing
fn good_tracing() {
    tracing::info!(request_id = "req-1", "activity 7 updated");
}

fn main() {
    bad_println();
    bad_eprintln();
    bad_dbg();
    good_tracing();
}
