pub mod coalesce;
