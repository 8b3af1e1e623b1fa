pub mod model_worker;
