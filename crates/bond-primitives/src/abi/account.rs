use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IAccountFactory {
        function createAccount(address owner, bytes32 salt) external returns (address account);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IAccount {
        function execute(address dest, uint256 value, bytes calldata func) external;
    }
}
