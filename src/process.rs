//! Launching programs and re-executing the window manager.

use std::os::unix::process::CommandExt;
use std::process::Command;

use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::setsid;
use tracing::{error, info, warn};

/// Let the kernel reap children so spawned programs never become zombies.
pub fn reap_children_automatically() {
    // SAFETY: SIG_IGN installs no handler code.
    #[allow(unsafe_code)]
    let result = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) };
    if let Err(e) = result {
        warn!("Could not ignore SIGCHLD: {}", e);
    }
}

/// Start `argv` in its own session, detached from the window manager.
pub fn spawn(argv: &[String]) {
    let Some((program, args)) = argv.split_first() else {
        return;
    };
    info!("Spawning: {}", argv.join(" "));

    let mut command = Command::new(program);
    command.args(args);
    // SAFETY: setsid and sigaction are async-signal-safe.
    #[allow(unsafe_code)]
    unsafe {
        command.pre_exec(|| {
            setsid().map_err(std::io::Error::from)?;
            // Ignored dispositions survive exec; give the child the default back
            signal(Signal::SIGCHLD, SigHandler::SigDfl).map_err(std::io::Error::from)?;
            Ok(())
        });
    }

    if let Err(e) = command.spawn() {
        error!("Failed to spawn '{}': {}", program, e);
    }
}

/// Replace the running process with a fresh copy of itself.
///
/// Only returns if the exec failed.
pub fn restart() {
    let mut args = std::env::args_os();
    let Some(program) = args.next() else {
        error!("Cannot restart: no program name");
        return;
    };
    info!("Restarting {:?}", program);
    let err = Command::new(&program).args(args).exec();
    error!("Restart failed: {}", err);
}
