mod activation;
mod launch;
