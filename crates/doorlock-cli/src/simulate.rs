//! Interactive simulator: stdin drives a simulated key matrix.

use std::time::Duration;

use anyhow::{Context, Result};
use doorlock_controller::{AccessController, DoorFlag, Driver, FlashingIndicator, Peripherals};
use doorlock_core::LockConfig;
use doorlock_hardware::SystemClock;
use doorlock_hardware::mock::{MockMatrix, MockMatrixHandle};
use doorlock_keypad::{KeyMap, KeypadMatrix};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::console::{ConsoleDisplay, ConsoleLed, ConsoleLock};

/// Loop periods a simulated key stays down, long enough to pass debounce.
const HOLD_PERIODS: u32 = 3;

pub async fn run(config: LockConfig) -> Result<()> {
    let keymap = KeyMap::from_config(&config).context("invalid key map")?;
    let (lines, matrix) = MockMatrix::new(keymap.rows(), keymap.cols());
    let clock = SystemClock::new();
    let keypad = KeypadMatrix::from_config(lines, clock, &config).context("building keypad")?;

    let door_flag = DoorFlag::new();
    let peripherals = Peripherals {
        display: ConsoleDisplay::new(),
        lock: ConsoleLock::new(config.actuator),
        indicator: FlashingIndicator::new(ConsoleLed::default(), door_flag.clone()),
        clock,
    };
    let loop_period = config.loop_period();
    let controller = AccessController::with_door_flag(config, peripherals, door_flag)
        .context("building controller")?;
    let driver = Driver::new(keypad, controller);

    println!("Type keys ({}) and press Enter. Ctrl-D quits.", layout(&keymap));

    tokio::select! {
        () = driver.run() => Ok(()),
        result = feed_stdin(keymap, matrix, loop_period) => result,
        result = tokio::signal::ctrl_c() => {
            result.context("waiting for Ctrl-C")?;
            info!("interrupted");
            Ok(())
        }
    }
}

/// Press each typed character on the matrix, one at a time.
async fn feed_stdin(keymap: KeyMap, matrix: MockMatrixHandle, loop_period: Duration) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        for symbol in line.chars().filter(|c| !c.is_whitespace()) {
            let Some((row, col)) = keymap.position(symbol) else {
                println!("[keypad] no key '{symbol}'");
                continue;
            };
            debug!(%symbol, row, col, "simulated press");
            matrix.press(row, col);
            tokio::time::sleep(loop_period * HOLD_PERIODS).await;
            matrix.release(row, col);
            tokio::time::sleep(loop_period).await;
        }
    }
    Ok(())
}

fn layout(keymap: &KeyMap) -> String {
    (0..keymap.rows())
        .map(|row| {
            (0..keymap.cols())
                .filter_map(|col| keymap.symbol(row, col))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
