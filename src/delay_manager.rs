use log::debug;
use rand::Rng;
use std::thread;
use std::time::Duration;

// One request at a time with a pause in between. Doubles as crude rate
// limiting for the remote site.

pub fn random_detail_delay() {
    sleep_ms(250, 750, "detail");
}

pub fn random_page_delay() {
    sleep_ms(1_000, 3_000, "page");
}

pub fn random_school_delay() {
    sleep_ms(2_000, 5_000, "school");
}

fn sleep_ms(min: u64, max: u64, kind: &str) {
    let mut rng = rand::thread_rng();
    let delay_ms = rng.gen_range(min..=max);
    debug!("Waiting {} ms ({} delay)", delay_ms, kind);
    thread::sleep(Duration::from_millis(delay_ms));
}
