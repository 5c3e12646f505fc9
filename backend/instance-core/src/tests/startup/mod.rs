mod autostart;
mod toggle;
