pub mod leaderboard;
pub mod members;
pub mod predictions;
pub mod results;
pub mod season;
pub mod weeks;
