mod init;
mod play;
